//! Support and resistance levels.

use serde::{Deserialize, Serialize};
use tradebot_core::error::IndicatorError;
use tradebot_core::types::Candle;

/// Price floor and ceiling over a window of candles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Levels {
    /// Minimum low
    pub support: f64,
    /// Maximum high
    pub resistance: f64,
}

/// Compute support (lowest low) and resistance (highest high).
///
/// `lookback` limits the scan to the most recent candles; `None` scans every
/// candle supplied.
pub fn support_resistance(
    candles: &[Candle],
    lookback: Option<usize>,
) -> Result<Levels, IndicatorError> {
    if lookback == Some(0) {
        return Err(IndicatorError::InvalidParameter(
            "levels lookback must be greater than 0".to_string(),
        ));
    }

    let required = lookback.unwrap_or(1);
    if candles.len() < required {
        return Err(IndicatorError::InsufficientData {
            required,
            available: candles.len(),
        });
    }

    let window = match lookback {
        Some(n) => &candles[candles.len() - n..],
        None => candles,
    };

    let levels = window.iter().fold(
        Levels {
            support: f64::INFINITY,
            resistance: f64::NEG_INFINITY,
        },
        |acc, c| Levels {
            support: acc.support.min(c.low),
            resistance: acc.resistance.max(c.high),
        },
    );

    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles() -> Vec<Candle> {
        vec![
            Candle::new(1, 10.0, 12.0, 8.0, 11.0, 100.0),
            Candle::new(2, 11.0, 15.0, 10.0, 14.0, 100.0),
            Candle::new(3, 14.0, 14.5, 12.0, 13.0, 100.0),
            Candle::new(4, 13.0, 13.5, 11.0, 12.0, 100.0),
        ]
    }

    #[test]
    fn test_levels_full_window() {
        let levels = support_resistance(&candles(), None).unwrap();
        assert_eq!(levels.support, 8.0);
        assert_eq!(levels.resistance, 15.0);
    }

    #[test]
    fn test_levels_respect_lookback() {
        let levels = support_resistance(&candles(), Some(2)).unwrap();
        assert_eq!(levels.support, 11.0);
        assert_eq!(levels.resistance, 14.5);
    }

    #[test]
    fn test_levels_bounds_contain_every_candle() {
        let data = candles();
        let levels = support_resistance(&data, None).unwrap();
        for c in &data {
            assert!(levels.support <= c.low && c.high <= levels.resistance);
        }
    }

    #[test]
    fn test_levels_errors() {
        assert!(matches!(
            support_resistance(&[], None),
            Err(IndicatorError::InsufficientData { required: 1, available: 0 })
        ));
        assert!(matches!(
            support_resistance(&candles(), Some(10)),
            Err(IndicatorError::InsufficientData { required: 10, available: 4 })
        ));
        assert!(matches!(
            support_resistance(&candles(), Some(0)),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }
}
