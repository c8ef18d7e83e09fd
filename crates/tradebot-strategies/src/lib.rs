//! Signal rules.
//!
//! Two rule sets turn an indicator snapshot into BUY, SELL or HOLD:
//! - Moving average crossover
//! - Oscillator confluence (RSI + MACD + support/resistance)

mod crossover;
mod oscillator;
mod registry;

pub use crossover::{CrossoverConfig, CrossoverRule};
pub use oscillator::{OscillatorConfig, OscillatorRule};
pub use registry::{StrategyInfo, StrategyRegistry};
