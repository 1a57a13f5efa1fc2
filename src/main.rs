use eyre::Result;
use std::sync::Arc;
use tracing::{info, warn};

use adn_bidder::adapters::adnuntius::AdnuntiusClient;
use adn_bidder::clock::{Clock, SystemClock};
use adn_bidder::config::Config;
use adn_bidder::engine::driver::Driver;
use adn_bidder::strategy;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    info!("Adnuntius bidder starting up...");

    let config = Config::load()?;
    info!(
        "Config loaded. Strategy: {}, network: {}, host: {}://{}",
        config.strategy, config.network_id, config.api_scheme, config.api_host
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let bidder = strategy::build(
        config.strategy,
        config.bid_table.clone(),
        config.pause_window,
        clock,
    );

    let poll_interval = config.poll_interval;
    let client = AdnuntiusClient::new(Arc::new(config))?;
    let driver = Driver::new(Box::new(client), bidder, poll_interval);

    driver.run_until(shutdown_signal()).await;

    info!("Bidder shut down gracefully");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "adn_bidder=info,bidder=info".into());
    let json = std::env::var("BIDDER_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install CTRL+C handler, running until killed: {:?}", e);
        std::future::pending::<()>().await;
    }
}
