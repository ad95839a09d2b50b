//! Activity stream server: wires the engine to PostgreSQL, seeds the
//! connection directory, and runs the background refresh loop.

mod config;
mod scheduled_tasks;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use tracing_subscriber::EnvFilter;

use activity_stream::{
    Connection, FacebookAdapter, FacebookVisibility, GraphPrivacyLookup, InMemoryDirectory,
    Normalizer, PgStore, ProviderRegistry, SyncConfig, SyncEngine, TwitterAdapter,
    TwitterVisibility,
};
use config::Config;

fn load_connections(path: &str) -> Result<Vec<Connection>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading connections file {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing connections file {}", path))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let store = Arc::new(
        PgStore::new(&config.database_url)
            .await
            .context("connecting to the database")?,
    );

    let connections = match &config.connections_file {
        Some(path) => load_connections(path)?,
        None => Vec::new(),
    };
    tracing::info!(count = connections.len(), "Seeded connection directory");
    let directory = Arc::new(InMemoryDirectory::with_connections(connections));

    let naive_offset = FixedOffset::east_opt(config.naive_tz_offset_hours * 3600)
        .context("NAIVE_TZ_OFFSET_HOURS out of range")?;
    let normalizer = Normalizer::new(naive_offset);

    let registry = ProviderRegistry::new()
        .with(
            Arc::new(TwitterAdapter::new()),
            normalizer,
            Arc::new(TwitterVisibility),
        )
        .with(
            Arc::new(FacebookAdapter::new()),
            normalizer,
            Arc::new(FacebookVisibility::new(Arc::new(GraphPrivacyLookup))),
        );

    let engine = Arc::new(
        SyncEngine::new(store, directory.clone(), registry).with_config(SyncConfig {
            fetch_timeout: std::time::Duration::from_secs(config.fetch_timeout_secs),
            fetch_limit: config.fetch_limit,
        }),
    );

    // Bring stream connections in line with the seeded directory, then
    // keep them in line as the directory changes.
    for user_id in directory.user_ids() {
        engine
            .reconcile(user_id)
            .await
            .with_context(|| format!("reconciling connections for user {}", user_id))?;
    }
    tokio::spawn(Arc::clone(&engine).run_reconciler());

    let _scheduler = scheduled_tasks::start_scheduler(engine, &config.refresh_cron).await?;

    tracing::info!("Server running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    Ok(())
}
