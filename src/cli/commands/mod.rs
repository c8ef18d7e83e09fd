//! CLI command implementations.

pub mod paper;
pub mod run;
pub mod strategies;
pub mod validate;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tradebot_broker::{AlpacaConfig, Credentials};
use tradebot_config::{AppConfig, AuthMethod, BrokerSettings, DataSourceKind};
use tradebot_core::traits::{MarketDataGateway, OrderDispatcher};
use tradebot_engine::{DataMode, Trader, TraderConfig};
use tradebot_indicators::IndicatorEngine;
use tradebot_risk::{RiskGate, RiskState};
use tradebot_strategies::StrategyRegistry;

/// Assemble a trader from configuration and the chosen collaborators.
pub(crate) fn build_trader(
    config: &AppConfig,
    gateway: Arc<dyn MarketDataGateway>,
    dispatcher: Arc<dyn OrderDispatcher>,
) -> Result<Trader> {
    let engine = IndicatorEngine::new(config.indicators.clone())?;
    let rule = StrategyRegistry::new()
        .create(&config.strategy.name, config.strategy.params.clone())?;
    let gate = RiskGate::new(config.risk.position_policy);
    let risk_state = RiskState::new(config.risk.max_position_size, config.risk.max_daily_loss);

    Ok(Trader::new(
        trader_config(config),
        gateway,
        dispatcher,
        engine,
        rule,
        gate,
        risk_state,
    ))
}

fn trader_config(config: &AppConfig) -> TraderConfig {
    let data_mode = match config.trading.data.source {
        DataSourceKind::Quotes => DataMode::Quotes,
        DataSourceKind::Candles => DataMode::Candles {
            interval_secs: config.trading.data.interval_secs,
            lookback: config.candle_lookback(),
        },
    };

    TraderConfig {
        symbol: config.trading.symbol.clone(),
        order_quantity: config.trading.order_quantity,
        poll_interval: Duration::from_secs(config.trading.poll_interval_secs),
        data_mode,
        history_capacity: config.trading.history_capacity,
        stop_on_no_data: false,
    }
}

/// Broker connection details, with secrets read from the environment.
pub(crate) fn alpaca_config(settings: &BrokerSettings) -> Result<AlpacaConfig> {
    let credentials = match settings.auth {
        AuthMethod::Keys => {
            Credentials::keys_from_env(&settings.api_key_env, &settings.api_secret_env)?
        }
        AuthMethod::Login => {
            let token_url = settings
                .token_url
                .clone()
                .context("broker.token_url is required for login authentication")?;
            Credentials::login_from_env(&settings.username_env, &settings.password_env, token_url)?
        }
    };

    let mut config = if settings.paper {
        AlpacaConfig::paper(credentials)
    } else {
        AlpacaConfig::live(credentials)
    };
    if let Some(url) = &settings.base_url {
        config.base_url = url.clone();
    }
    if let Some(url) = &settings.data_url {
        config.data_url = url.clone();
    }
    config.feed = settings.feed.clone();

    Ok(config)
}

/// Resolves on Ctrl-C.
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C, running until stopped");
        std::future::pending::<()>().await;
    }
}
