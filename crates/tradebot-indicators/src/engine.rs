//! Per-cycle indicator computation.

use serde::{Deserialize, Serialize};
use tradebot_core::error::IndicatorError;
use tradebot_core::traits::Indicator;
use tradebot_core::types::{Candle, IndicatorSnapshot};

use crate::levels::support_resistance;
use crate::momentum::{Macd, Rsi};
use crate::moving_average::Sma;

/// Indicator periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    /// Short SMA period
    pub short_period: usize,
    /// Long SMA period
    pub long_period: usize,
    /// RSI period
    pub rsi_period: usize,
    /// MACD fast EMA period
    pub macd_fast: usize,
    /// MACD slow EMA period
    pub macd_slow: usize,
    /// MACD signal EMA period
    pub macd_signal: usize,
    /// Candles scanned for support/resistance (`None` = whole window)
    pub levels_lookback: Option<usize>,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            short_period: 10,
            long_period: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            levels_lookback: None,
        }
    }
}

impl IndicatorSettings {
    /// Default settings with custom SMA periods.
    pub fn with_sma_periods(short_period: usize, long_period: usize) -> Self {
        Self {
            short_period,
            long_period,
            ..Self::default()
        }
    }

    /// Check that every period is usable.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let periods = [
            ("short_period", self.short_period),
            ("long_period", self.long_period),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(IndicatorError::InvalidParameter(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        if self.short_period >= self.long_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "short_period ({}) must be less than long_period ({})",
                self.short_period, self.long_period
            )));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "macd_fast ({}) must be less than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }

        if self.levels_lookback == Some(0) {
            return Err(IndicatorError::InvalidParameter(
                "levels_lookback must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Candles needed before a snapshot exists: both SMAs and the level window.
    ///
    /// RSI and MACD are not part of this gate; they read `None` until
    /// [`warm_up_points`](Self::warm_up_points) candles are available.
    pub fn required_points(&self) -> usize {
        self.short_period
            .max(self.long_period)
            .max(self.levels_lookback.unwrap_or(1))
    }

    /// Candles needed before every snapshot field, RSI and MACD included, has a value.
    pub fn warm_up_points(&self) -> usize {
        self.required_points()
            .max(self.rsi_period.saturating_add(1))
            .max(self.macd_slow.saturating_add(self.macd_signal).saturating_sub(1))
    }
}

/// `Ok(None)` while an optional indicator is still warming up.
fn warming<T>(reading: Result<T, IndicatorError>) -> Result<Option<T>, IndicatorError> {
    match reading {
        Ok(value) => Ok(Some(value)),
        Err(IndicatorError::InsufficientData { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Computes an [`IndicatorSnapshot`] from a window of candles.
///
/// Holds only validated periods; every call recomputes from scratch.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
    sma_short: Sma,
    sma_long: Sma,
    rsi: Rsi,
    macd: Macd,
}

impl IndicatorEngine {
    /// Create an engine, rejecting invalid periods.
    pub fn new(settings: IndicatorSettings) -> Result<Self, IndicatorError> {
        settings.validate()?;

        Ok(Self {
            sma_short: Sma::new(settings.short_period)?,
            sma_long: Sma::new(settings.long_period)?,
            rsi: Rsi::new(settings.rsi_period)?,
            macd: Macd::new(settings.macd_fast, settings.macd_slow, settings.macd_signal)?,
            settings,
        })
    }

    /// Settings in use.
    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    /// Minimum candles needed by [`compute`](Self::compute).
    pub fn required_points(&self) -> usize {
        self.settings.required_points()
    }

    /// Compute the newest value of each indicator.
    ///
    /// Fails with `InsufficientData` only when the SMAs or levels cannot be
    /// computed; RSI and MACD are left `None` when the window is too short for them.
    pub fn compute(&self, candles: &[Candle]) -> Result<IndicatorSnapshot, IndicatorError> {
        let required = self.required_points();
        if candles.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: candles.len(),
            });
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let levels = support_resistance(candles, self.settings.levels_lookback)?;

        Ok(IndicatorSnapshot {
            sma_short: self.sma_short.latest(&closes)?,
            sma_long: self.sma_long.latest(&closes)?,
            rsi: warming(self.rsi.latest(&closes))?,
            macd: warming(self.macd.latest(&closes))?,
            support: levels.support,
            resistance: levels.resistance,
        })
    }
}

/// Compute a snapshot with custom SMA periods and default RSI/MACD periods.
pub fn compute_indicators(
    candles: &[Candle],
    short_period: usize,
    long_period: usize,
) -> Result<IndicatorSnapshot, IndicatorError> {
    IndicatorEngine::new(IndicatorSettings::with_sma_periods(short_period, long_period))?
        .compute(candles)
}
