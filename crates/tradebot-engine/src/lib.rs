//! Polling trading loop.
//!
//! Each cycle runs Gateway -> Indicators -> Signal -> Risk -> Dispatch to
//! completion before the next one starts.

mod stats;
mod trader;

pub use stats::SessionStats;
pub use trader::{CycleOutcome, DataMode, Trader, TraderConfig};
