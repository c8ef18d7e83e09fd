//! Position types.

use num_traits::Signed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

/// A position in a single security, as reported by the broker.
///
/// `quantity` is always the absolute share count; direction lives in `side`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Number of shares (absolute)
    pub quantity: Decimal,
    /// Long or short
    pub side: PositionSide,
    /// Average entry price
    pub avg_entry_price: Decimal,
}

impl Position {
    /// Create a new position.
    pub fn new(
        symbol: impl Into<String>,
        quantity: Decimal,
        side: PositionSide,
        avg_entry_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: quantity.abs(),
            side,
            avg_entry_price,
        }
    }

    /// Create a position from a signed quantity (negative = short).
    pub fn from_signed(symbol: impl Into<String>, quantity: Decimal, avg_entry_price: Decimal) -> Self {
        let side = if quantity.is_negative() {
            PositionSide::Short
        } else {
            PositionSide::Long
        };
        Self::new(symbol, quantity, side, avg_entry_price)
    }

    /// Quantity with sign (positive for long, negative for short).
    pub fn signed_quantity(&self) -> Decimal {
        match self.side {
            PositionSide::Long => self.quantity,
            PositionSide::Short => -self.quantity,
        }
    }

    /// Check if the position holds any shares.
    pub fn is_open(&self) -> bool {
        self.quantity != Decimal::ZERO
    }

    /// Check if this is a long position.
    pub fn is_long(&self) -> bool {
        self.is_open() && self.side == PositionSide::Long
    }

    /// Check if this is a short position.
    pub fn is_short(&self) -> bool {
        self.is_open() && self.side == PositionSide::Short
    }

    /// Apply a fill to the position.
    /// Returns the realized P&L if the position is being reduced.
    pub fn apply_fill(&mut self, side: Side, quantity: Decimal, price: Decimal) -> Decimal {
        let current = self.signed_quantity();
        let fill_qty = side.sign() * quantity;

        let mut realized = Decimal::ZERO;

        let same_direction = (current.is_positive() && fill_qty.is_positive())
            || (current.is_negative() && fill_qty.is_negative());

        let new_quantity = if same_direction || current == Decimal::ZERO {
            // Adding to position - update average entry price
            let total_cost = current * self.avg_entry_price + fill_qty * price;
            let new_quantity = current + fill_qty;
            if new_quantity != Decimal::ZERO {
                self.avg_entry_price = total_cost / new_quantity;
            }
            new_quantity
        } else {
            // Reducing or reversing position
            let close_qty = fill_qty.abs().min(current.abs());

            realized = if current > Decimal::ZERO {
                close_qty * (price - self.avg_entry_price)
            } else {
                close_qty * (self.avg_entry_price - price)
            };

            let remaining = fill_qty.abs() - close_qty;
            if remaining > Decimal::ZERO {
                // Position reversed
                self.avg_entry_price = price;
                fill_qty.signum() * remaining
            } else {
                current + fill_qty
            }
        };

        self.side = if new_quantity < Decimal::ZERO {
            PositionSide::Short
        } else {
            PositionSide::Long
        };
        self.quantity = new_quantity.abs();

        realized
    }
}
