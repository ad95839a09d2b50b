//! Typed errors for the activity stream engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;
use uuid::Uuid;

use crate::types::Provider;

/// Failure of a whole adapter invocation against a provider.
///
/// Retryable by design: the orchestrator leaves the connection's
/// watermark untouched so the next cycle tries again.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Transport-level failure reaching the provider.
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The provider rejected the request (auth, rate limit, bad account).
    #[error("provider API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The call budget for one adapter invocation ran out.
    #[error("timeout fetching from {provider}")]
    Timeout { provider: Provider },
}

/// A payload that could not be converted into a canonical item.
///
/// Never fatal to a batch: the orchestrator skips the offending item
/// and continues.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unparseable timestamp `{value}`")]
    Timestamp { value: String },

    /// The original payload could not be serialized for audit storage.
    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Storage backend failure.
///
/// A natural-key duplicate is NOT an error: `insert_item_if_absent`
/// reports it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("stream connection not found: {0}")]
    MissingStreamConnection(Uuid),
}

/// The connection directory could not be consulted.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("connection directory unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure of a per-item privacy lookup.
///
/// Neutral for publication: the item keeps whatever visibility it
/// already has.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("privacy lookup failed: {0}")]
    Lookup(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Per-connection sync failure, and the aggregate `run_sync` contract.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] AdapterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Every connection that was attempted this cycle failed.
    #[error("all {failed} attempted connections failed to sync")]
    AllConnectionsFailed { failed: usize },
}
