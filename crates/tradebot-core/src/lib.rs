//! Core types and traits for the trading bot.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Candle, PriceSeries, Quote)
//! - Order and position types
//! - Trading signals
//! - Collaborator traits for market data, order dispatch, signal rules and indicators

pub mod types;
pub mod traits;
pub mod error;

pub use error::{TradingError, TradingResult};
pub use types::*;
pub use traits::*;
