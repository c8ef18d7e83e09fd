//! CLI definitions.

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tradebot_config::AppConfig;

#[derive(Parser)]
#[command(name = "tradebot")]
#[command(author, version, about = "Single-symbol polling trading bot")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trade against the configured broker
    Run(RunArgs),
    /// Trade against an in-memory broker
    Paper(PaperArgs),
    /// List available signal rules
    Strategies,
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

/// Overrides shared by the trading commands.
#[derive(clap::Args)]
pub struct TradingOverrides {
    /// Symbol to trade
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// Signal rule
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Seconds between polling cycles
    #[arg(short, long)]
    pub interval: Option<u64>,
}

impl TradingOverrides {
    /// Apply the overrides and re-validate.
    pub fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(symbol) = &self.symbol {
            config.trading.symbol = symbol.to_uppercase();
        }
        if let Some(strategy) = &self.strategy {
            if *strategy != config.strategy.name {
                config.strategy.name = strategy.clone();
                config.strategy.params = serde_json::Value::Null;
            }
        }
        if let Some(interval) = self.interval {
            config.trading.poll_interval_secs = interval;
        }
        config.validate()?;
        Ok(())
    }
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub overrides: TradingOverrides,
}

#[derive(clap::Args)]
pub struct PaperArgs {
    #[command(flatten)]
    pub overrides: TradingOverrides,

    /// Replay prices from a CSV file instead of polling the broker
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Candles revealed before the first cycle when replaying
    #[arg(long, requires = "data")]
    pub preload: Option<usize>,

    /// Slippage percentage applied to paper fills
    #[arg(long, default_value = "0")]
    pub slippage: rust_decimal::Decimal,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the effective configuration
    #[arg(long)]
    pub print: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_paper_replay() {
        let cli = Cli::try_parse_from([
            "tradebot",
            "--log-level",
            "debug",
            "paper",
            "--data",
            "prices.csv",
            "--preload",
            "49",
            "-S",
            "msft",
        ])
        .unwrap();

        assert!(matches!(cli.log_level, Some(LogLevel::Debug)));
        let Commands::Paper(args) = cli.command else {
            panic!("expected paper command");
        };
        assert_eq!(args.preload, Some(49));
        assert_eq!(args.data, Some(PathBuf::from("prices.csv")));

        let mut config = AppConfig::default();
        args.overrides.apply(&mut config).unwrap();
        assert_eq!(config.trading.symbol, "MSFT");
    }

    #[test]
    fn test_preload_requires_data() {
        assert!(Cli::try_parse_from(["tradebot", "paper", "--preload", "10"]).is_err());
    }

    #[test]
    fn test_strategy_override_resets_params() {
        let mut config = AppConfig::default();
        config.strategy.params = serde_json::json!({ "min_separation": 0.5 });

        let overrides = TradingOverrides {
            symbol: None,
            strategy: Some("oscillator".to_string()),
            interval: Some(5),
        };
        overrides.apply(&mut config).unwrap();

        assert_eq!(config.strategy.name, "oscillator");
        assert!(config.strategy.params.is_null());
        assert_eq!(config.trading.poll_interval_secs, 5);
    }

    #[test]
    fn test_unknown_strategy_override_fails() {
        let mut config = AppConfig::default();
        let overrides = TradingOverrides {
            symbol: None,
            strategy: Some("martingale".to_string()),
            interval: None,
        };
        assert!(overrides.apply(&mut config).is_err());
    }
}
