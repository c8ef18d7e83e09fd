//! Indicator trait.

use crate::error::IndicatorError;

/// An indicator evaluated at the newest close of a window.
///
/// The bot only ever reads the most recent value, so implementations reduce
/// the whole window to a single reading instead of producing a series.
pub trait Indicator: Send + Sync {
    /// Reading produced for one window.
    type Value;

    /// Closes needed before the first reading exists.
    fn required_points(&self) -> usize;

    /// Reading at the last element of `closes`.
    fn latest(&self, closes: &[f64]) -> Result<Self::Value, IndicatorError>;

    /// `InsufficientData` unless `closes` covers [`required_points`](Self::required_points).
    fn ensure_points(&self, closes: &[f64]) -> Result<(), IndicatorError> {
        let required = self.required_points();
        if closes.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: closes.len(),
            });
        }
        Ok(())
    }
}
