// Startup Directory - Web Server
// JSON API over the cached catalogue

use anyhow::{Context, Result};
use std::sync::Arc;
use startup_directory::api::router;
use startup_directory::{DirectoryConfig, EntityCache, HttpSource};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = DirectoryConfig::from_env()?;
    info!(feed = %config.feed_url, schema = %config.schema.version, "starting startup directory server");

    let source = HttpSource::new(config.feed_url.clone(), config.timeout)?;
    let cache = Arc::new(EntityCache::new(source, config.schema.clone()));

    // Warm the cache; a failure here is not fatal, the next request retries
    if let Err(error) = cache.load().await {
        warn!(%error, "initial feed load failed");
    }

    let app = router(cache);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "server running");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
