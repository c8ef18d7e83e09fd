//! Offline market data sources.
//!
//! [`CsvReplayGateway`] replays historical candles through the
//! [`MarketDataGateway`](tradebot_core::traits::MarketDataGateway) interface,
//! one candle per polling cycle.

mod csv_source;

pub use csv_source::CsvReplayGateway;
