//! Moving Average Crossover rule.
//!
//! Buys while the short SMA is above the long SMA and sells while it is
//! below. Equal averages hold.

use serde::{Deserialize, Serialize};
use tradebot_core::{
    error::StrategyError,
    traits::{RuleConfig, SignalRule},
    types::{Candle, IndicatorSnapshot, Signal},
};

/// Configuration for the crossover rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    /// Minimum gap between the averages before a signal fires
    pub min_separation: f64,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self { min_separation: 0.0 }
    }
}

impl RuleConfig for CrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if !self.min_separation.is_finite() || self.min_separation < 0.0 {
            return Err(StrategyError::InvalidConfig(
                "min_separation must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

/// Moving Average Crossover rule.
#[derive(Debug, Clone, Default)]
pub struct CrossoverRule {
    config: CrossoverConfig,
}

impl CrossoverRule {
    /// Create a new crossover rule.
    pub fn new(config: CrossoverConfig) -> Self {
        Self { config }
    }
}

impl SignalRule for CrossoverRule {
    fn name(&self) -> &str {
        "crossover"
    }

    fn evaluate(&self, snapshot: &IndicatorSnapshot, _latest: &Candle) -> Signal {
        let gap = snapshot.sma_short - snapshot.sma_long;

        // NaN falls through to Hold
        if gap > self.config.min_separation {
            Signal::Buy
        } else if gap < -self.config.min_separation {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn description(&self) -> &str {
        "Short SMA above long SMA buys, below sells"
    }
}
