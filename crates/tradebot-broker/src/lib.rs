//! Broker integrations.
//!
//! Both brokers implement [`MarketDataGateway`](tradebot_core::traits::MarketDataGateway)
//! and [`OrderDispatcher`](tradebot_core::traits::OrderDispatcher):
//! - [`AlpacaBroker`] talks to the Alpaca REST API
//! - [`PaperBroker`] fills orders in memory at a marked price

mod alpaca;
mod paper;
mod session;

pub use alpaca::{AlpacaBroker, AlpacaConfig, Credentials};
pub use paper::{PaperBroker, PaperFeed};
pub use session::{AccessToken, Authenticator, PasswordAuthenticator, TokenSession};
