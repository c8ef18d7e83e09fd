//! Core data types for the trading bot.

mod candle;
mod order;
mod position;
mod signal;
mod snapshot;

pub use candle::{Candle, PriceSeries};
pub use order::{Order, OrderRequest, OrderStatus, Side};
pub use position::{Position, PositionSide};
pub use signal::Signal;
pub use snapshot::{IndicatorSnapshot, MacdReading};
