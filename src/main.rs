//! Scraper entry point. Behaviour comes entirely from configuration; the
//! process exits zero even when the run fails, the log says what happened.

use anyhow::{Context, Result};
use autos_crawler_lib::application::CrawlOrchestrator;
use autos_crawler_lib::infrastructure::{
    AppConfig, HttpClient, init_logging_with_config, log_system_info,
};
use tracing::{error, info};

async fn run() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    log_system_info();

    let client = HttpClient::with_config(&config.http)?;
    let orchestrator = CrawlOrchestrator::new(&client, &config)?;
    let summary = orchestrator.run().await;

    if summary.brands_found > 0 {
        info!("Data written under {}", config.crawler.data_dir.display());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Scraper stopped: {:#}", e);
        eprintln!("Scraper stopped: {:#}", e);
    }
}
