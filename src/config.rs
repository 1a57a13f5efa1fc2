use clap::Parser;
use eyre::{Result, WrapErr};
use std::time::Duration;

use crate::cli::Cli;
use crate::domain::Currency;
use crate::error::ConfigError;
use crate::schedule::PauseWindow;
use crate::strategy::{BidTable, StrategyKind};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub network_id: String,
    pub api_scheme: String,
    pub api_host: String,
    pub strategy: StrategyKind,
    pub poll_interval: Duration,
    pub bid_table: BidTable,
    pub pause_window: PauseWindow,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let cli = Cli::parse();
        Self::from_cli(&cli).wrap_err("invalid bidder configuration")
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let strategy: StrategyKind = cli.strategy.parse()?;

        if cli.poll_secs == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }

        let currency = Currency::parse(cli.currency.trim())?;
        let bid_table = BidTable::parse(&currency, cli.default_bid, &cli.site_bids)?;
        let pause_window = PauseWindow::parse(&cli.pause_start, &cli.pause_end, &cli.utc_offset)?;

        Ok(Config {
            api_key: cli.api_key.clone(),
            network_id: cli.network_id.clone(),
            api_scheme: cli.api_scheme.clone(),
            api_host: cli.api_host.clone(),
            strategy,
            poll_interval: Duration::from_secs(cli.poll_secs),
            bid_table,
            pause_window,
        })
    }
}
