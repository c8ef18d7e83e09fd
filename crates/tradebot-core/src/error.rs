//! Error types for the trading bot.

use thiserror::Error;

/// Top-level error for a single trading cycle.
///
/// Every variant is recoverable: the cycle that produced it is abandoned and
/// the bot waits for the next polling interval.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Market data error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),
}

/// Failure to obtain market data or account state from a provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Unsupported candle interval: {0} seconds")]
    InvalidInterval(u64),

    #[error("No data available for {0}")]
    NoData(String),
}

/// Failure to place or query an order.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Order rejected: {0}")]
    Rejected(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Signal rule errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),
}

/// Session authentication errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Missing credentials: {0}")]
    Missing(String),

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<AuthError> for FetchError {
    fn from(err: AuthError) -> Self {
        FetchError::Authentication(err.to_string())
    }
}

impl From<AuthError> for OrderError {
    fn from(err: AuthError) -> Self {
        OrderError::Authentication(err.to_string())
    }
}

/// Result type alias for trading operations.
pub type TradingResult<T> = Result<T, TradingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_converts_to_fetch_and_order_errors() {
        let fetch: FetchError = AuthError::LoginFailed("bad password".into()).into();
        assert!(matches!(fetch, FetchError::Authentication(ref msg) if msg.contains("bad password")));

        let order: OrderError = AuthError::Missing("ALPACA_USERNAME".into()).into();
        assert!(matches!(order, OrderError::Authentication(_)));
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = IndicatorError::InsufficientData { required: 50, available: 12 };
        assert_eq!(err.to_string(), "Insufficient data: need 50 points, have 12");
    }
}
