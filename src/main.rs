mod catalog;
mod checker;
mod command;
mod config;
mod dispatch;
mod platform;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::catalog::Catalog;
use crate::checker::fetch::HttpFetcher;
use crate::checker::markup::Indicator;
use crate::checker::AvailabilityChecker;
use crate::config::Config;
use crate::dispatch::CommandDispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stockbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let catalog = Catalog::new(config.catalog.clone());

    info!("Configuration loaded successfully");
    info!("  Label: {}", config.label);
    info!("  Catalog entries: {}", catalog.len());
    info!("  Fetch timeout: {:?}", config.http.timeout());
    info!(
        "  Stock indicator: <{} class=\"{}\">",
        config.indicator.tag, config.indicator.class
    );
    if catalog.is_empty() {
        warn!("Catalog is empty; every check will report the product as not known");
    }

    let fetcher = HttpFetcher::new(&config.http)?;
    let checker =
        AvailabilityChecker::new(catalog, fetcher, Indicator::from_config(&config.indicator));
    let dispatcher = Arc::new(CommandDispatcher::new(config.label.clone(), checker));

    let bot = teloxide::Bot::new(&config.api_key);

    info!("Bot is starting...");
    platform::telegram::run(dispatcher, bot).await?;

    Ok(())
}
