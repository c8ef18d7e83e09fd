//! Momentum indicators.

use tradebot_core::error::IndicatorError;
use tradebot_core::traits::Indicator;
use tradebot_core::types::MacdReading;

use crate::moving_average::Ema;

/// Relative strength index with Wilder smoothing.
///
/// Average gain and loss are seeded with the plain mean of the first `period`
/// changes, then updated as `avg = (avg * (period - 1) + change) / period`.
/// A window with no movement reads 50; one with no losses reads 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "RSI period must be greater than 0".to_string(),
            ));
        }
        Ok(Self { period })
    }
}

impl Indicator for Rsi {
    type Value = f64;

    /// `period` changes need one extra close.
    fn required_points(&self) -> usize {
        self.period + 1
    }

    fn latest(&self, closes: &[f64]) -> Result<f64, IndicatorError> {
        self.ensure_points(closes)?;

        let p = self.period as f64;
        let mut changes = closes.windows(2).map(|w| w[1] - w[0]);

        let (gain, loss) = changes
            .by_ref()
            .take(self.period)
            .fold((0.0, 0.0), |(g, l), c| (g + c.max(0.0), l + (-c).max(0.0)));
        let (gain, loss) = changes.fold((gain / p, loss / p), |(g, l), c| {
            ((g * (p - 1.0) + c.max(0.0)) / p, (l * (p - 1.0) + (-c).max(0.0)) / p)
        });

        Ok(if gain == 0.0 && loss == 0.0 {
            50.0
        } else if loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        })
    }
}

/// MACD line (fast EMA minus slow EMA) and its signal EMA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    slow_period: usize,
    signal_period: usize,
    offset: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        if fast >= slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD fast period ({}) must be less than slow period ({})",
                fast, slow
            )));
        }

        Ok(Self {
            fast: Ema::new(fast)?,
            slow: Ema::new(slow)?,
            signal: Ema::new(signal)?,
            slow_period: slow,
            signal_period: signal,
            offset: slow - fast,
        })
    }
}

impl Indicator for Macd {
    type Value = MacdReading;

    /// The slow EMA, then `signal - 1` more MACD values to seed the signal line.
    fn required_points(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn latest(&self, closes: &[f64]) -> Result<MacdReading, IndicatorError> {
        self.ensure_points(closes)?;

        let fast = self.fast.series(closes);
        let line: Vec<f64> = fast[self.offset..]
            .iter()
            .zip(self.slow.series(closes))
            .map(|(f, s)| f - s)
            .collect();

        let signal = self.signal.latest(&line)?;
        Ok(MacdReading {
            macd: line[line.len() - 1],
            signal,
        })
    }
}
