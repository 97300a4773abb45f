//! # Rates Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Construct the single process-wide cache instance
//! - Wrap the upstream source in the cached provider
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rates_cache::MemoryCache;
use rates_hex::{CachedRateProvider, inbound::HttpServer};
use rates_upstream::FrankfurterSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rates_app=debug,rates_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting rates server on port {}", config.port);
    tracing::info!("Using upstream source: {}", config.upstream_url);

    // One cache instance for the whole process; lives until shutdown.
    let cache = Arc::new(MemoryCache::new());

    let source = FrankfurterSource::with_base_url(&config.upstream_url);
    let provider = CachedRateProvider::with_ttl(source, cache, config.ttl);

    // Create and run the HTTP server
    let server = HttpServer::new(provider);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
