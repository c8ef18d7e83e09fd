//! Per-session cycle tallies.

use serde::Serialize;

use crate::CycleOutcome;

/// Counts of cycle outcomes since startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub cycles: u64,
    pub warming_up: u64,
    pub holds: u64,
    pub rejected: u64,
    pub orders: u64,
    pub failures: u64,
}

impl SessionStats {
    pub fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::WarmingUp { .. } => self.warming_up += 1,
            CycleOutcome::Hold => self.holds += 1,
            CycleOutcome::Rejected(_) => self.rejected += 1,
            CycleOutcome::Executed(_) => self.orders += 1,
            CycleOutcome::Failed(_) => self.failures += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradebot_core::error::{FetchError, TradingError};
    use tradebot_risk::RejectReason;

    #[test]
    fn test_record() {
        let mut stats = SessionStats::default();
        stats.record(&CycleOutcome::WarmingUp { required: 50, available: 1 });
        stats.record(&CycleOutcome::Hold);
        stats.record(&CycleOutcome::Rejected(RejectReason::NoAction));
        stats.record(&CycleOutcome::Failed(TradingError::Fetch(FetchError::NoData(
            "AAPL".into(),
        ))));

        assert_eq!(stats.cycles, 4);
        assert_eq!(stats.warming_up, 1);
        assert_eq!(stats.holds, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.orders, 0);
    }
}
