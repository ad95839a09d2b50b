//! Provider adapter trait for pluggable post ingestion.
//!
//! Each adapter wraps one external API and outputs uniform [`RawPost`]
//! values, making provider content indistinguishable downstream.

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::types::{Connection, Provider, RawPost};

/// Bounds for one adapter invocation.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Maximum number of posts to fetch per collection.
    pub limit: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { limit: 30 }
    }
}

/// Result of one adapter invocation.
///
/// `partial_errors` carries sub-collection failures that did not abort
/// the rest of the fetch (e.g. Facebook photos failing while statuses
/// succeed). The orchestrator logs them and processes the surviving
/// posts normally.
#[derive(Debug, Default)]
pub struct FetchBatch {
    pub posts: Vec<RawPost>,
    pub partial_errors: Vec<AdapterError>,
}

impl FetchBatch {
    /// A batch where every sub-collection succeeded.
    pub fn complete(posts: Vec<RawPost>) -> Self {
        Self {
            posts,
            partial_errors: Vec::new(),
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.partial_errors.is_empty()
    }
}

/// Fetches recent posts for an authenticated connection.
///
/// Implementations must treat a failure of one sub-collection as a
/// partial result, not a batch failure; only a failure of the whole
/// invocation returns `Err`.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Fetch the most recent posts for a connection, bounded by `opts`.
    async fn fetch_recent(
        &self,
        connection: &Connection,
        opts: &FetchOptions,
    ) -> Result<FetchBatch, AdapterError>;

    /// Which provider this adapter serves (registry key, logging).
    fn provider(&self) -> Provider;
}
