//! Oscillator confluence rule.
//!
//! Buys only when RSI is oversold, MACD is above its signal line and the
//! close sits at or below support. Sells on the mirrored conditions.
//! Holds while RSI or MACD is still warming up.

use serde::{Deserialize, Serialize};
use tradebot_core::{
    error::StrategyError,
    traits::{RuleConfig, SignalRule},
    types::{Candle, IndicatorSnapshot, Signal},
};

/// Configuration for the oscillator rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    /// Oversold threshold (buy below this)
    pub oversold: f64,
    /// Overbought threshold (sell above this)
    pub overbought: f64,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl RuleConfig for OscillatorConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.overbought <= self.oversold {
            return Err(StrategyError::InvalidConfig(
                "Overbought must be greater than oversold".into(),
            ));
        }
        if self.overbought > 100.0 || self.oversold < 0.0 {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

/// RSI/MACD/support-resistance confluence rule.
#[derive(Debug, Clone, Default)]
pub struct OscillatorRule {
    config: OscillatorConfig,
}

impl OscillatorRule {
    /// Create a new oscillator rule.
    pub fn new(config: OscillatorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OscillatorConfig {
        &self.config
    }
}

impl SignalRule for OscillatorRule {
    fn name(&self) -> &str {
        "oscillator"
    }

    fn evaluate(&self, snapshot: &IndicatorSnapshot, latest: &Candle) -> Signal {
        let (Some(rsi), Some(macd)) = (snapshot.rsi, snapshot.macd) else {
            return Signal::Hold;
        };
        let close = latest.close;

        let buy = rsi < self.config.oversold
            && macd.macd > macd.signal
            && close <= snapshot.support;

        let sell = rsi > self.config.overbought
            && macd.macd < macd.signal
            && close >= snapshot.resistance;

        if buy {
            Signal::Buy
        } else if sell {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn description(&self) -> &str {
        "Oversold RSI with bullish MACD at support buys; the mirror at resistance sells"
    }
}
