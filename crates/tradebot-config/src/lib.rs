//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, AuthMethod, BrokerSettings, DataSettings, DataSourceKind,
    LoggingConfig, RiskSettings, StrategySettings, TradingSettings,
};

use config::{Config, ConfigError, Environment, File, FileFormat};
use rust_decimal::Decimal;
use std::path::Path;
use thiserror::Error;
use tradebot_strategies::StrategyRegistry;

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from file and environment, then validate it.
///
/// Environment variables override file values, e.g.
/// `TRADEBOT__TRADING__SYMBOL=MSFT`.
pub fn load_config(path: &Path) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("TRADEBOT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(toml: &str) -> Result<AppConfig, SettingsError> {
    let app: AppConfig = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()?;
    app.validate()?;
    Ok(app)
}

impl AppConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::Invalid(msg));

        if self.trading.symbol.trim().is_empty() {
            return invalid("trading.symbol must not be empty".into());
        }
        if self.trading.order_quantity <= Decimal::ZERO {
            return invalid(format!(
                "trading.order_quantity must be positive, got {}",
                self.trading.order_quantity
            ));
        }
        self.indicators
            .validate()
            .map_err(|e| SettingsError::Invalid(format!("indicators: {}", e)))?;

        if self.trading.data.source == DataSourceKind::Candles {
            if self.trading.data.interval_secs == 0 {
                return invalid("trading.data.interval_secs must be greater than 0".into());
            }
            if self.trading.data.lookback != 0
                && self.trading.data.lookback < self.indicators.required_points()
            {
                return invalid(format!(
                    "trading.data.lookback ({}) is shorter than the indicator warm-up ({})",
                    self.trading.data.lookback,
                    self.indicators.required_points()
                ));
            }
        }
        if self.trading.history_capacity != 0
            && self.trading.history_capacity < self.indicators.required_points()
        {
            return invalid(format!(
                "trading.history_capacity ({}) is shorter than the indicator warm-up ({})",
                self.trading.history_capacity,
                self.indicators.required_points()
            ));
        }

        if self.risk.max_position_size <= Decimal::ZERO {
            return invalid("risk.max_position_size must be positive".into());
        }
        if self.risk.max_daily_loss <= Decimal::ZERO {
            return invalid("risk.max_daily_loss must be positive".into());
        }

        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "pretty" | "json") {
            return invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            ));
        }

        if self.broker.auth == AuthMethod::Login && self.broker.token_url.is_none() {
            return invalid("broker.token_url is required when broker.auth = \"login\"".into());
        }

        StrategyRegistry::new()
            .create(&self.strategy.name, self.strategy.params.clone())
            .map_err(|e| SettingsError::Invalid(format!("strategy: {}", e)))?;

        Ok(())
    }

    /// Candles requested per cycle in candle mode.
    ///
    /// `lookback = 0` fetches enough for every indicator, RSI and MACD included.
    pub fn candle_lookback(&self) -> usize {
        if self.trading.data.lookback == 0 {
            self.indicators.warm_up_points()
        } else {
            self.trading.data.lookback
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradebot_risk::PositionPolicy;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.trading.symbol, "AAPL");
        assert_eq!(config.trading.poll_interval_secs, 60);
        assert_eq!(config.trading.order_quantity, dec!(10));
        assert_eq!(config.risk.max_position_size, dec!(100));
        assert_eq!(config.risk.max_daily_loss, dec!(500));
        assert_eq!(config.indicators.short_period, 10);
        assert_eq!(config.indicators.long_period, 50);
        assert_eq!(config.strategy.name, "crossover");
    }

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(
            r#"
            [app]
            name = "tradebot"
            environment = "test"

            [logging]
            level = "debug"
            format = "json"
            file = "logs/bot.log"

            [trading]
            symbol = "MSFT"
            poll_interval_secs = 30
            order_quantity = 5

            [trading.data]
            source = "candles"
            interval_secs = 300
            lookback = 120

            [indicators]
            short_period = 5
            long_period = 20

            [strategy]
            name = "oscillator"

            [strategy.params]
            oversold = 25.0
            overbought = 75.0

            [risk]
            max_position_size = 50
            max_daily_loss = 250.5
            position_policy = "allow_scaling"
            "#,
        )
        .unwrap();

        assert!(config.logging.is_json());
        assert_eq!(config.logging.file.as_deref(), Some("logs/bot.log"));
        assert_eq!(config.trading.symbol, "MSFT");
        assert_eq!(config.trading.order_quantity, dec!(5));
        assert_eq!(config.trading.data.source, DataSourceKind::Candles);
        assert_eq!(config.candle_lookback(), 120);
        assert_eq!(config.indicators.short_period, 5);
        // Unset indicator fields keep their defaults
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.strategy.params["oversold"], 25.0);
        assert_eq!(config.risk.max_daily_loss, dec!(250.5));
        assert_eq!(config.risk.position_policy, PositionPolicy::AllowScaling);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.trading.symbol, "AAPL");
        assert_eq!(config.candle_lookback(), 50);
    }

    #[test]
    fn test_invalid_periods_rejected() {
        let result = parse_config(
            r#"
            [indicators]
            short_period = 50
            long_period = 10
            "#,
        );
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_zero_macd_periods_rejected_without_panic() {
        let mut config = AppConfig::default();
        config.indicators.macd_slow = 0;
        config.indicators.macd_signal = 0;
        config.trading.history_capacity = 10;

        assert!(matches!(config.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_default_lookback_covers_oscillators() {
        let mut config = AppConfig::default();
        config.indicators.short_period = 5;
        config.indicators.long_period = 20;

        assert_eq!(config.indicators.required_points(), 20);
        assert_eq!(config.candle_lookback(), 34);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let mut config = AppConfig::default();
        config.strategy.name = "martingale".to_string();
        assert!(matches!(config.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.trading.order_quantity = Decimal::ZERO;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.broker.auth = AuthMethod::Login;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.trading.history_capacity = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = AppConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed = parse_config(&rendered).unwrap();

        assert_eq!(parsed.trading.symbol, config.trading.symbol);
        assert_eq!(parsed.risk.max_daily_loss, config.risk.max_daily_loss);
    }
}
