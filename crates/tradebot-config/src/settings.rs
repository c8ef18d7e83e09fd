//! Configuration structures.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tradebot_indicators::IndicatorSettings;
use tradebot_risk::PositionPolicy;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub broker: BrokerSettings,
    #[serde(default)]
    pub trading: TradingSettings,
    #[serde(default)]
    pub indicators: IndicatorSettings,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub risk: RiskSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "tradebot".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rolling log file, in addition to stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// How the broker authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// API key id + secret headers
    #[default]
    Keys,
    /// Username/password exchanged for a bearer token
    Login,
}

/// Broker connection settings.
///
/// Secrets are never stored here, only the names of the environment
/// variables that hold them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    pub paper: bool,
    /// Override for the trading API root
    pub base_url: Option<String>,
    /// Override for the market data API root
    pub data_url: Option<String>,
    pub feed: String,
    pub auth: AuthMethod,
    pub api_key_env: String,
    pub api_secret_env: String,
    pub username_env: String,
    pub password_env: String,
    /// Token endpoint for `auth = "login"`
    pub token_url: Option<String>,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            paper: true,
            base_url: None,
            data_url: None,
            feed: "iex".to_string(),
            auth: AuthMethod::Keys,
            api_key_env: "ALPACA_API_KEY".to_string(),
            api_secret_env: "ALPACA_API_SECRET".to_string(),
            username_env: "ALPACA_USERNAME".to_string(),
            password_env: "ALPACA_PASSWORD".to_string(),
            token_url: None,
        }
    }
}

/// Where each cycle's prices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    /// Poll the latest quote and accumulate a price series
    #[default]
    Quotes,
    /// Fetch a window of candles every cycle
    Candles,
}

/// Market data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub source: DataSourceKind,
    /// Candle interval for `source = "candles"`
    pub interval_secs: u64,
    /// Candles requested per cycle; 0 uses the indicator warm-up length
    pub lookback: usize,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: DataSourceKind::Quotes,
            interval_secs: 60,
            lookback: 0,
        }
    }
}

/// Trading loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingSettings {
    pub symbol: String,
    pub poll_interval_secs: u64,
    /// Fixed shares per order
    pub order_quantity: Decimal,
    /// Polled prices retained in quote mode (0 = unlimited)
    pub history_capacity: usize,
    pub data: DataSettings,
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            poll_interval_secs: 60,
            order_quantity: dec!(10),
            history_capacity: 1000,
            data: DataSettings::default(),
        }
    }
}

/// Signal rule selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    /// Registry name: `crossover` or `oscillator`
    pub name: String,
    /// Rule parameters; missing fields use the rule's defaults
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            name: "crossover".to_string(),
            params: serde_json::Value::Null,
        }
    }
}

/// Risk limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    /// Largest position per symbol, in shares
    pub max_position_size: Decimal,
    /// Realized loss per day at which trading stops
    pub max_daily_loss: Decimal,
    pub position_policy: PositionPolicy,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            max_position_size: dec!(100),
            max_daily_loss: dec!(500),
            position_policy: PositionPolicy::SinglePositionPerSymbol,
        }
    }
}
