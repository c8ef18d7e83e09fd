//! Technical indicators.
//!
//! This crate provides the indicators the signal rules read:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Support/resistance levels
//!
//! [`IndicatorEngine`] combines them into one [`IndicatorSnapshot`] per cycle.

pub mod engine;
pub mod levels;
pub mod momentum;
pub mod moving_average;

pub use engine::{compute_indicators, IndicatorEngine, IndicatorSettings};
pub use levels::{support_resistance, Levels};
pub use momentum::{Macd, Rsi};
pub use moving_average::{Ema, Sma};
pub use tradebot_core::types::{IndicatorSnapshot, MacdReading};
