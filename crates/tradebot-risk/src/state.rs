//! Daily risk limits and the running loss counter.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Limits plus the loss accumulated in the current trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskState {
    /// Largest position quantity allowed per symbol
    pub max_position_size: Decimal,
    /// Loss at which trading stops for the day
    pub max_daily_loss: Decimal,
    /// Net realized loss today (negative after a net gain)
    pub current_loss: Decimal,
    /// Trading day `current_loss` belongs to
    pub session_date: Option<NaiveDate>,
}

impl Default for RiskState {
    fn default() -> Self {
        Self::new(dec!(100), dec!(500))
    }
}

impl RiskState {
    /// Create a state with zero loss.
    pub fn new(max_position_size: Decimal, max_daily_loss: Decimal) -> Self {
        Self {
            max_position_size,
            max_daily_loss,
            current_loss: Decimal::ZERO,
            session_date: None,
        }
    }

    /// Start a new session if `today` differs from the current one.
    ///
    /// Returns true when the loss counter was reset.
    pub fn roll_day(&mut self, today: NaiveDate) -> bool {
        match self.session_date {
            Some(date) if date == today => false,
            Some(date) => {
                info!(
                    previous = %date,
                    today = %today,
                    loss = %self.current_loss,
                    "New trading day, resetting daily loss"
                );
                self.session_date = Some(today);
                self.current_loss = Decimal::ZERO;
                true
            }
            None => {
                self.session_date = Some(today);
                false
            }
        }
    }

    /// Book realized P&L from a fill. Gains reduce the running loss.
    pub fn record_realized_pnl(&mut self, pnl: Decimal) {
        self.current_loss -= pnl;
    }

    /// Check whether the daily loss limit has been reached.
    pub fn loss_limit_reached(&self) -> bool {
        self.current_loss >= self.max_daily_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_record_realized_pnl() {
        let mut state = RiskState::default();

        state.record_realized_pnl(dec!(-300));
        assert_eq!(state.current_loss, dec!(300));
        assert!(!state.loss_limit_reached());

        state.record_realized_pnl(dec!(-200));
        assert!(state.loss_limit_reached());

        state.record_realized_pnl(dec!(50));
        assert_eq!(state.current_loss, dec!(450));
    }

    #[test]
    fn test_roll_day_resets_loss() {
        let mut state = RiskState::default();

        assert!(!state.roll_day(date(4)));
        state.record_realized_pnl(dec!(-600));

        assert!(!state.roll_day(date(4)));
        assert_eq!(state.current_loss, dec!(600));

        assert!(state.roll_day(date(5)));
        assert_eq!(state.current_loss, Decimal::ZERO);
        assert_eq!(state.session_date, Some(date(5)));
    }
}
