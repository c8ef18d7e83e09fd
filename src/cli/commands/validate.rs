//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use tradebot_config::{AppConfig, SettingsError};

use crate::cli::ValidateArgs;

pub fn run(
    args: ValidateArgs,
    config_path: &Path,
    loaded: Result<AppConfig, SettingsError>,
) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    println!("Configuration is valid!");
    println!();
    println!("Environment: {}", config.app.environment);
    println!("Symbol: {}", config.trading.symbol);
    println!("Poll interval: {}s", config.trading.poll_interval_secs);
    println!("Order quantity: {}", config.trading.order_quantity);
    println!("Strategy: {}", config.strategy.name);
    println!(
        "Indicator warm-up: {} points ({} with RSI and MACD)",
        config.indicators.required_points(),
        config.indicators.warm_up_points()
    );
    println!("Max position size: {}", config.risk.max_position_size);
    println!("Max daily loss: {}", config.risk.max_daily_loss);
    println!("Broker paper mode: {}", config.broker.paper);

    if args.print {
        println!();
        print!("{}", config.to_toml()?);
    }

    Ok(())
}
