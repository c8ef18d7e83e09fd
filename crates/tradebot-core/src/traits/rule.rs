//! Signal rule trait definitions.

use crate::error::StrategyError;
use crate::types::{Candle, IndicatorSnapshot, Signal};

/// Configuration trait for signal rules.
pub trait RuleConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Turns the latest indicator readings into a trade decision.
///
/// Rules are stateless and deterministic: the same snapshot and candle always
/// yield the same signal.
pub trait SignalRule: Send + Sync {
    /// Get the unique name of this rule.
    fn name(&self) -> &str;

    /// Decide BUY, SELL or HOLD.
    ///
    /// # Arguments
    /// * `snapshot` - Indicator values computed from the current window
    /// * `latest` - The most recent candle of that window
    fn evaluate(&self, snapshot: &IndicatorSnapshot, latest: &Candle) -> Signal;

    /// Get a description of the rule.
    fn description(&self) -> &str {
        ""
    }
}
