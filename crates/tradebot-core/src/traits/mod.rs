//! Collaborator traits for the trading bot.

mod dispatcher;
mod gateway;
mod indicator;
mod rule;

pub use dispatcher::OrderDispatcher;
pub use gateway::{MarketDataGateway, Quote};
pub use indicator::Indicator;
pub use rule::{RuleConfig, SignalRule};
