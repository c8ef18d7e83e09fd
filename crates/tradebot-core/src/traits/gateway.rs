//! Market data gateway trait definition.

use crate::error::FetchError;
use crate::types::Candle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Latest quote for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol
    pub symbol: String,
    /// Last traded price
    pub price: f64,
    /// Best bid price
    pub bid: f64,
    /// Best ask price
    pub ask: f64,
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl Quote {
    /// Get the mid price.
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Get the spread.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

/// Trait for market data providers.
///
/// Implementations perform I/O only; they never retry on their own.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Fetch the latest quote.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError>;

    /// Fetch the most recent candles.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `interval_secs` - Candle interval in seconds
    /// * `count` - Maximum number of candles to return
    ///
    /// # Returns
    /// Candles ordered from oldest to newest
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval_secs: u64,
        count: usize,
    ) -> Result<Vec<Candle>, FetchError>;

    /// Get the gateway name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_calculations() {
        let quote = Quote {
            symbol: "AAPL".to_string(),
            price: 150.01,
            bid: 149.95,
            ask: 150.05,
            timestamp: 1000,
        };

        assert!((quote.mid() - 150.0).abs() < 0.001);
        assert!((quote.spread() - 0.10).abs() < 0.001);
    }
}
