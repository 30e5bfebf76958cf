//! biztime server binary
//!
//! Loads [`AppConfig`], initializes tracing, picks a store and serves until
//! SIGTERM or Ctrl+C. With the `postgres` feature and a database URL the
//! PostgreSQL store is used; otherwise data lives in memory.

use anyhow::Result;
use biztime::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let builder = with_configured_store(ServerBuilder::new(), &config).await?;
    builder.serve(&config.bind_addr()).await
}

#[cfg(feature = "postgres")]
async fn with_configured_store(
    builder: ServerBuilder,
    config: &AppConfig,
) -> Result<ServerBuilder> {
    if config.database.url.is_some() {
        let store = PostgresStore::connect(&config.database).await?;
        return Ok(builder.with_store(store));
    }

    tracing::warn!("No database url configured, using the in-memory store");
    Ok(builder.with_store(InMemoryStore::new()))
}

#[cfg(not(feature = "postgres"))]
async fn with_configured_store(
    builder: ServerBuilder,
    config: &AppConfig,
) -> Result<ServerBuilder> {
    if config.database.url.is_some() {
        tracing::warn!("Built without the `postgres` feature, ignoring the database url");
    }

    tracing::info!("Using the in-memory store");
    Ok(builder.with_store(InMemoryStore::new()))
}
