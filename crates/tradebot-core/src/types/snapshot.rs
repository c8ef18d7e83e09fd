//! Latest indicator readings.

use serde::{Deserialize, Serialize};

/// MACD line and its signal line at the newest close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdReading {
    /// Fast EMA minus slow EMA
    pub macd: f64,
    /// EMA of the MACD line
    pub signal: f64,
}

/// Newest value of each indicator, computed from one window of candles.
///
/// The moving averages and levels are always present once the window covers
/// the long SMA. RSI and MACD warm up independently and stay `None` until the
/// window is long enough for them, so rules that ignore them can act earlier.
/// Recomputed from scratch each cycle; the previous snapshot is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Short-period simple moving average
    pub sma_short: f64,
    /// Long-period simple moving average
    pub sma_long: f64,
    /// Relative strength index, 0..=100
    pub rsi: Option<f64>,
    pub macd: Option<MacdReading>,
    /// Lowest low over the level lookback
    pub support: f64,
    /// Highest high over the level lookback
    pub resistance: f64,
}
