//! Broker trading command.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tradebot_broker::AlpacaBroker;
use tradebot_config::AppConfig;

use super::{alpaca_config, build_trader, shutdown_signal};
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, mut config: AppConfig) -> Result<()> {
    args.overrides.apply(&mut config)?;

    let broker = Arc::new(AlpacaBroker::new(alpaca_config(&config.broker)?)?);
    info!(
        symbol = %config.trading.symbol,
        strategy = %config.strategy.name,
        paper = config.broker.paper,
        "Connecting to broker"
    );

    let mut trader = build_trader(&config, broker.clone(), broker)?;
    trader.run(shutdown_signal()).await;

    Ok(())
}
