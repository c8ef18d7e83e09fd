//! Paper trading command.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tradebot_broker::{AlpacaBroker, PaperBroker, PaperFeed};
use tradebot_config::AppConfig;
use tradebot_core::traits::MarketDataGateway;
use tradebot_data::CsvReplayGateway;

use super::{alpaca_config, build_trader, shutdown_signal};
use crate::cli::PaperArgs;

pub async fn run(args: PaperArgs, mut config: AppConfig) -> Result<()> {
    args.overrides.apply(&mut config)?;

    let broker = Arc::new(PaperBroker::new().with_slippage(args.slippage));
    let symbol = config.trading.symbol.clone();

    let replay = args.data.is_some();
    let gateway: Arc<dyn MarketDataGateway> = match &args.data {
        Some(path) => {
            let csv = CsvReplayGateway::from_path(&symbol, path)?
                .with_preload(args.preload.unwrap_or(0));
            Arc::new(PaperFeed::new(csv, broker.clone()))
        }
        None => {
            let alpaca = AlpacaBroker::new(alpaca_config(&config.broker)?)?;
            Arc::new(PaperFeed::new(alpaca, broker.clone()))
        }
    };

    info!(
        symbol = %symbol,
        strategy = %config.strategy.name,
        data = gateway.name(),
        "Paper trading"
    );

    let mut trader = build_trader(&config, gateway, broker.clone())?;
    if replay {
        trader.config_mut().stop_on_no_data = true;
    }
    trader.run(shutdown_signal()).await;

    let orders = broker.orders();
    info!(
        orders = orders.len(),
        position = %broker
            .position(&symbol)
            .map(|p| p.signed_quantity())
            .unwrap_or_default(),
        daily_loss = %trader.risk_state().current_loss,
        "Paper session finished"
    );
    for order in orders {
        println!(
            "{}  {:<4} {} {} @ {}",
            order.created_at.format("%Y-%m-%d %H:%M:%S"),
            order.side,
            order.filled_quantity,
            order.symbol,
            order
                .filled_avg_price
                .map(|p| p.round_dp(4).to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    Ok(())
}
