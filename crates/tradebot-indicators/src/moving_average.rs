//! Moving averages of closing prices.

use tradebot_core::error::IndicatorError;
use tradebot_core::traits::Indicator;

fn positive(name: &str, period: usize) -> Result<usize, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be greater than 0",
            name
        )));
    }
    Ok(period)
}

/// Mean of the last `period` closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            period: positive("SMA", period)?,
        })
    }
}

impl Indicator for Sma {
    type Value = f64;

    fn required_points(&self) -> usize {
        self.period
    }

    fn latest(&self, closes: &[f64]) -> Result<f64, IndicatorError> {
        self.ensure_points(closes)?;
        let window = &closes[closes.len() - self.period..];
        Ok(window.iter().sum::<f64>() / self.period as f64)
    }
}

/// Exponential moving average seeded with the SMA of the first `period` values.
///
/// Each later value `v` updates `ema = v * k + ema * (1 - k)` with
/// `k = 2 / (period + 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ema {
    period: usize,
    k: f64,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = positive("EMA", period)?;
        Ok(Self {
            period,
            k: 2.0 / (period as f64 + 1.0),
        })
    }

    /// Running EMA from the seed onwards; empty when `values` is too short.
    ///
    /// MACD needs the whole line to feed its signal EMA.
    pub(crate) fn series(&self, values: &[f64]) -> Vec<f64> {
        if values.len() < self.period {
            return Vec::new();
        }

        let seed = values[..self.period].iter().sum::<f64>() / self.period as f64;
        let mut out = Vec::with_capacity(values.len() - self.period + 1);
        out.push(seed);
        values[self.period..].iter().fold(seed, |ema, &v| {
            let next = v * self.k + ema * (1.0 - self.k);
            out.push(next);
            next
        });
        out
    }
}

impl Indicator for Ema {
    type Value = f64;

    fn required_points(&self) -> usize {
        self.period
    }

    fn latest(&self, closes: &[f64]) -> Result<f64, IndicatorError> {
        self.ensure_points(closes)?;
        let seed = closes[..self.period].iter().sum::<f64>() / self.period as f64;
        Ok(closes[self.period..]
            .iter()
            .fold(seed, |ema, &v| v * self.k + ema * (1.0 - self.k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_uses_last_period_closes() {
        let closes: Vec<f64> = (1..=10).map(|v| v as f64).collect();

        assert!((Sma::new(3).unwrap().latest(&closes).unwrap() - 9.0).abs() < 1e-10);
        assert!((Sma::new(10).unwrap().latest(&closes).unwrap() - 5.5).abs() < 1e-10);
    }

    #[test]
    fn test_sma_short_window() {
        let err = Sma::new(5).unwrap().latest(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, IndicatorError::InsufficientData { required: 5, available: 3 });
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(Sma::new(0), Err(IndicatorError::InvalidParameter(_))));
        assert!(matches!(Ema::new(0), Err(IndicatorError::InvalidParameter(_))));
    }

    #[test]
    fn test_ema_hand_computed() {
        // k = 0.5, seed (1+2+3)/3 = 2, then 3.0, then 4.0
        let ema = Ema::new(3).unwrap();
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];

        assert!((ema.latest(&closes).unwrap() - 4.0).abs() < 1e-10);
        assert_eq!(ema.series(&closes), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ema_series_ends_at_latest() {
        let ema = Ema::new(4).unwrap();
        let closes: Vec<f64> = (0..25).map(|i| 50.0 + (i as f64 * 0.7).sin()).collect();

        let series = ema.series(&closes);
        assert_eq!(series.len(), 25 - 4 + 1);
        assert!((series[series.len() - 1] - ema.latest(&closes).unwrap()).abs() < 1e-12);
        assert!(ema.series(&closes[..3]).is_empty());
    }

    #[test]
    fn test_ema_flat_closes() {
        let ema = Ema::new(5).unwrap();
        assert!((ema.latest(&[42.0; 20]).unwrap() - 42.0).abs() < 1e-10);
    }
}
