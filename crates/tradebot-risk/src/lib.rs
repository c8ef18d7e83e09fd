//! Risk management for trading.
//!
//! Provides the pre-trade risk gate, daily loss tracking, and the fill
//! ledger that feeds realized P&L into the loss counter.

mod ledger;
mod risk_gate;
mod state;

pub use ledger::FillLedger;
pub use risk_gate::{Approval, PositionPolicy, RejectReason, RiskDecision, RiskGate};
pub use state::RiskState;
