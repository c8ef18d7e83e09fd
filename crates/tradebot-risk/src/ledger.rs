//! Fill ledger.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;
use tradebot_core::types::{Position, PositionSide, Side};

/// Positions built from the bot's own fills.
///
/// Only used to compute realized P&L; the broker stays the source of truth
/// for open positions.
#[derive(Debug, Clone, Default)]
pub struct FillLedger {
    positions: HashMap<String, Position>,
}

impl FillLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fill and return the P&L it realized.
    pub fn record_fill(
        &mut self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Decimal {
        let position = self
            .positions
            .entry(symbol.to_string())
            .or_insert_with(|| Position::new(symbol, Decimal::ZERO, PositionSide::Long, price));

        let realized = position.apply_fill(side, quantity, price);

        debug!(
            symbol,
            side = %side,
            quantity = %quantity,
            price = %price,
            realized = %realized,
            net = %position.signed_quantity(),
            "Fill recorded"
        );

        if !position.is_open() {
            self.positions.remove(symbol);
        }

        realized
    }

    /// Ledger position for a symbol, if any.
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip_loss() {
        let mut ledger = FillLedger::new();

        let opened = ledger.record_fill("AAPL", Side::Buy, dec!(10), dec!(150));
        assert_eq!(opened, Decimal::ZERO);
        assert_eq!(ledger.position("AAPL").unwrap().quantity, dec!(10));

        let closed = ledger.record_fill("AAPL", Side::Sell, dec!(10), dec!(140));
        assert_eq!(closed, dec!(-100));
        assert!(ledger.position("AAPL").is_none());
    }

    #[test]
    fn test_short_round_trip_gain() {
        let mut ledger = FillLedger::new();

        ledger.record_fill("TSLA", Side::Sell, dec!(5), dec!(200));
        assert!(ledger.position("TSLA").unwrap().is_short());

        let realized = ledger.record_fill("TSLA", Side::Buy, dec!(5), dec!(190));
        assert_eq!(realized, dec!(50));
    }

    #[test]
    fn test_symbols_independent() {
        let mut ledger = FillLedger::new();

        ledger.record_fill("AAPL", Side::Buy, dec!(10), dec!(100));
        let realized = ledger.record_fill("MSFT", Side::Sell, dec!(10), dec!(300));

        assert_eq!(realized, Decimal::ZERO);
        assert!(ledger.position("AAPL").unwrap().is_long());
        assert!(ledger.position("MSFT").unwrap().is_short());
    }
}
