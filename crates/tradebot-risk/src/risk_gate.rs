//! Pre-trade risk gate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};
use tradebot_core::types::{OrderRequest, Position, Side, Signal};

use crate::RiskState;

/// How the gate treats an already open position in the traded symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPolicy {
    /// Ignore new signals while any position in the symbol is open
    #[default]
    SinglePositionPerSymbol,
    /// Allow adding to or reducing an open position, up to the size limit
    AllowScaling,
}

/// Why a signal was not approved.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// HOLD signal - no action needed
    NoAction,
    /// An existing position already reached the size limit
    PositionLimit { quantity: Decimal, max: Decimal },
    /// Daily loss limit reached
    DailyLossLimit { loss: Decimal, max: Decimal },
    /// A position in the symbol is already open
    PositionAlreadyOpen { quantity: Decimal },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoAction => write!(f, "Hold signal - no action needed"),
            RejectReason::PositionLimit { quantity, max } => {
                write!(f, "Position size {} at or above limit {}", quantity, max)
            }
            RejectReason::DailyLossLimit { loss, max } => {
                write!(f, "Daily loss {} at or above limit {}", loss, max)
            }
            RejectReason::PositionAlreadyOpen { quantity } => {
                write!(f, "Position of {} already open", quantity)
            }
        }
    }
}

/// Permission to trade one side of one symbol.
///
/// Only [`RiskGate`] can create one, so an order built from it has always
/// passed the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Approval {
    symbol: String,
    side: Side,
}

impl Approval {
    /// Approved symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Approved side.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Turn the approval into a market order for `quantity`.
    pub fn into_order(self, quantity: Decimal) -> OrderRequest {
        OrderRequest::market(self.symbol, self.side, quantity)
    }
}

/// Decision from the risk gate.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskDecision {
    /// Signal may be executed
    Approved(Approval),
    /// Signal must be dropped
    Rejected(RejectReason),
}

impl RiskDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, RiskDecision::Approved(_))
    }

    pub fn approval(self) -> Option<Approval> {
        match self {
            RiskDecision::Approved(approval) => Some(approval),
            RiskDecision::Rejected(_) => None,
        }
    }
}

/// Checks signals against position and daily loss limits.
#[derive(Debug, Clone, Default)]
pub struct RiskGate {
    policy: PositionPolicy,
}

impl RiskGate {
    /// Create a new risk gate.
    pub fn new(policy: PositionPolicy) -> Self {
        Self { policy }
    }

    /// Get the position policy.
    pub fn policy(&self) -> PositionPolicy {
        self.policy
    }

    /// Evaluate a signal for `symbol` against current positions and limits.
    pub fn evaluate(
        &self,
        signal: Signal,
        symbol: &str,
        positions: &[Position],
        state: &RiskState,
    ) -> RiskDecision {
        let decision = self.check(signal, symbol, positions, state);

        match &decision {
            RiskDecision::Approved(approval) => {
                info!(symbol, side = %approval.side, "Risk gate approved signal");
            }
            RiskDecision::Rejected(RejectReason::NoAction) => {}
            RiskDecision::Rejected(reason) => {
                warn!(symbol, signal = %signal, reason = %reason, "Risk gate rejected signal");
            }
        }

        decision
    }

    /// Boolean form of [`evaluate`](Self::evaluate).
    pub fn approve(
        &self,
        signal: Signal,
        symbol: &str,
        positions: &[Position],
        state: &RiskState,
    ) -> bool {
        self.evaluate(signal, symbol, positions, state).is_approved()
    }

    fn check(
        &self,
        signal: Signal,
        symbol: &str,
        positions: &[Position],
        state: &RiskState,
    ) -> RiskDecision {
        let side = match signal.side() {
            Some(side) => side,
            None => return RiskDecision::Rejected(RejectReason::NoAction),
        };

        let held: Vec<&Position> = positions.iter().filter(|p| p.symbol == symbol).collect();

        if let Some(position) = held
            .iter()
            .find(|p| p.quantity >= state.max_position_size)
        {
            return RiskDecision::Rejected(RejectReason::PositionLimit {
                quantity: position.quantity,
                max: state.max_position_size,
            });
        }

        if state.loss_limit_reached() {
            return RiskDecision::Rejected(RejectReason::DailyLossLimit {
                loss: state.current_loss,
                max: state.max_daily_loss,
            });
        }

        if self.policy == PositionPolicy::SinglePositionPerSymbol {
            if let Some(position) = held.iter().find(|p| p.is_open()) {
                return RiskDecision::Rejected(RejectReason::PositionAlreadyOpen {
                    quantity: position.quantity,
                });
            }
        }

        RiskDecision::Approved(Approval {
            symbol: symbol.to_string(),
            side,
        })
    }
}
