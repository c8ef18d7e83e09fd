//! CSV replay gateway.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};
use tradebot_core::error::FetchError;
use tradebot_core::traits::{MarketDataGateway, Quote};
use tradebot_core::types::Candle;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Parse the date formats found in common OHLCV exports.
fn parse_timestamp(date_str: &str) -> Result<i64, FetchError> {
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(FetchError::Parse(format!("Could not parse date: {}", date_str)))
}

/// Replays candles from a CSV file, revealing one more candle per call.
///
/// `fetch_quote` returns the newly revealed candle's close;
/// `fetch_candles` returns the last `count` candles revealed so far.
pub struct CsvReplayGateway {
    symbol: String,
    candles: Vec<Candle>,
    cursor: AtomicUsize,
}

impl CsvReplayGateway {
    /// Load candles for `symbol` from a CSV file.
    pub fn from_path(symbol: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| FetchError::Parse(format!("{}: {}", path.display(), e)))?;

        let gateway = Self::from_csv(symbol.into(), reader)?;
        info!(
            symbol = %gateway.symbol,
            path = %path.display(),
            candles = gateway.candles.len(),
            "CSV replay loaded"
        );
        Ok(gateway)
    }

    /// Load candles for `symbol` from any CSV reader.
    pub fn from_reader<R: Read>(symbol: impl Into<String>, reader: R) -> Result<Self, FetchError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self::from_csv(symbol.into(), reader)
    }

    fn from_csv<R: Read>(symbol: String, mut reader: csv::Reader<R>) -> Result<Self, FetchError> {
        let mut candles = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| FetchError::Parse(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;

            candles.push(Candle::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        candles.sort_by_key(|c| c.timestamp);

        Ok(Self {
            symbol,
            candles,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Reveal the first `n` candles up front.
    pub fn with_preload(self, n: usize) -> Self {
        self.cursor.store(n.min(self.candles.len()), Ordering::SeqCst);
        self
    }

    /// Total candles loaded.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Check if nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Candles not yet revealed.
    pub fn remaining(&self) -> usize {
        self.candles.len() - self.cursor.load(Ordering::SeqCst).min(self.candles.len())
    }

    /// Reveal the next candle; returns how many are visible.
    fn advance(&self, symbol: &str) -> Result<usize, FetchError> {
        if symbol != self.symbol {
            return Err(FetchError::NoData(symbol.to_string()));
        }

        let revealed = self.cursor.fetch_add(1, Ordering::SeqCst) + 1;
        if revealed > self.candles.len() {
            self.cursor.store(self.candles.len(), Ordering::SeqCst);
            return Err(FetchError::NoData(symbol.to_string()));
        }
        Ok(revealed)
    }
}

#[async_trait]
impl MarketDataGateway for CsvReplayGateway {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError> {
        let revealed = self.advance(symbol)?;
        let candle = self.candles[revealed - 1];

        debug!(symbol, price = candle.close, remaining = self.remaining(), "Replayed quote");
        Ok(Quote {
            symbol: symbol.to_string(),
            price: candle.close,
            bid: candle.close,
            ask: candle.close,
            timestamp: candle.timestamp,
        })
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval_secs: u64,
        count: usize,
    ) -> Result<Vec<Candle>, FetchError> {
        let revealed = self.advance(symbol)?;
        let start = revealed.saturating_sub(count);

        debug!(
            symbol,
            interval_secs,
            returned = revealed - start,
            remaining = self.remaining(),
            "Replayed candles"
        );
        Ok(self.candles[start..revealed].to_vec())
    }

    fn name(&self) -> &str {
        "CSV Replay"
    }
}
