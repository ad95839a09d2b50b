use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// JSON file seeding the connection directory; optional so the
    /// server can start empty and receive connections at runtime.
    pub connections_file: Option<String>,
    /// 6-field cron expression for the background refresh loop.
    pub refresh_cron: String,
    /// Total call budget for one adapter invocation, in seconds.
    pub fetch_timeout_secs: u64,
    /// Maximum posts fetched per provider collection.
    pub fetch_limit: usize,
    /// Offset (in hours) applied to provider timestamps that carry no
    /// timezone. Storage is always UTC.
    pub naive_tz_offset_hours: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            connections_file: env::var("CONNECTIONS_FILE").ok(),
            refresh_cron: env::var("REFRESH_CRON")
                .unwrap_or_else(|_| "0 */15 * * * *".to_string()),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("FETCH_TIMEOUT_SECS must be a valid number")?,
            fetch_limit: env::var("FETCH_LIMIT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("FETCH_LIMIT must be a valid number")?,
            naive_tz_offset_hours: env::var("NAIVE_TZ_OFFSET_HOURS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .context("NAIVE_TZ_OFFSET_HOURS must be a valid number")?,
        })
    }
}
