//! Trading bot CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use tradebot_config::{load_config, LoggingConfig};
use tradebot_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(&cli.config);

    // Logging settings come from the file when it loads
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    let level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| logging.level.clone());
    let log_file = match cli.command {
        Commands::Run(_) | Commands::Paper(_) => logging.file.as_deref().map(Path::new),
        Commands::Strategies | Commands::ValidateConfig(_) => None,
    };
    let _guard = setup_logging(&level, cli.json_logs || logging.is_json(), log_file)?;

    let config_context = || format!("Failed to load {}", cli.config.display());

    match cli.command {
        Commands::Run(args) => {
            cli::commands::run::run(args, loaded.with_context(config_context)?).await
        }
        Commands::Paper(args) => {
            cli::commands::paper::run(args, loaded.with_context(config_context)?).await
        }
        Commands::Strategies => cli::commands::strategies::run(),
        Commands::ValidateConfig(args) => cli::commands::validate::run(args, &cli.config, loaded),
    }
}
