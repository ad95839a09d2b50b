//! Sync orchestration: the top-level ingestion cycle.
//!
//! Per connection, each cycle runs CHECK_DUE → (skip | FETCH →
//! per-item NORMALIZE → ANNOTATE → UPSERT) → ADVANCE_WATERMARK.
//! Connections of one stream are processed sequentially; streams run
//! concurrently in the background loop.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AdapterError, StoreError, SyncError};
use crate::registry::{ProviderRegistry, ProviderRegistration};
use crate::scheduler;
use crate::traits::adapter::FetchOptions;
use crate::traits::directory::ConnectionDirectory;
use crate::traits::store::StreamStore;
use crate::types::{Connection, Provider, Stream, StreamConnection, StreamItem};

/// Engine-wide tunables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Total call budget for one adapter invocation.
    pub fetch_timeout: Duration,
    /// Maximum posts fetched per collection.
    pub fetch_limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            fetch_limit: 30,
        }
    }
}

/// Counters for one connection's successful sync.
#[derive(Debug, Default, Clone)]
pub struct ConnectionSyncStats {
    pub fetched: usize,
    pub stored: usize,
    pub duplicates: usize,
    pub skipped_normalization: usize,
    pub partial_failures: usize,
}

/// Outcome of one connection within a cycle.
#[derive(Debug)]
pub enum ConnectionOutcome {
    /// Refresh window has not elapsed.
    Skipped,
    /// No adapter registered for the provider.
    UnknownProvider,
    Synced(ConnectionSyncStats),
    Failed(SyncError),
}

/// Per-connection diagnostics for one orchestration cycle.
#[derive(Debug)]
pub struct ConnectionReport {
    pub stream_connection_id: Uuid,
    pub provider: Provider,
    pub outcome: ConnectionOutcome,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub connections: Vec<ConnectionReport>,
}

impl SyncReport {
    /// Items stored across all connections this cycle.
    pub fn stored(&self) -> usize {
        self.connections
            .iter()
            .filter_map(|c| match &c.outcome {
                ConnectionOutcome::Synced(stats) => Some(stats.stored),
                _ => None,
            })
            .sum()
    }

    fn attempted(&self) -> usize {
        self.connections
            .iter()
            .filter(|c| {
                matches!(
                    c.outcome,
                    ConnectionOutcome::Synced(_) | ConnectionOutcome::Failed(_)
                )
            })
            .count()
    }

    fn failed(&self) -> usize {
        self.connections
            .iter()
            .filter(|c| matches!(c.outcome, ConnectionOutcome::Failed(_)))
            .count()
    }
}

/// The top-level orchestrator.
pub struct SyncEngine {
    store: Arc<dyn StreamStore>,
    directory: Arc<dyn ConnectionDirectory>,
    registry: ProviderRegistry,
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn StreamStore>,
        directory: Arc<dyn ConnectionDirectory>,
        registry: ProviderRegistry,
    ) -> Self {
        Self {
            store,
            directory,
            registry,
            config: SyncConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one orchestration cycle for a user's stream.
    ///
    /// Partial success is success: an error comes back only when every
    /// attempted connection failed. Per-connection outcomes are in the
    /// report either way.
    pub async fn run_sync(&self, user_id: Uuid) -> Result<SyncReport, SyncError> {
        let stream = self.store.get_or_create_stream(user_id).await?;
        let connections: HashMap<Uuid, Connection> = self
            .directory
            .list_active_connections(user_id)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut report = SyncReport::default();
        for sc in self.store.stream_connections(stream.id).await? {
            if !sc.is_active {
                continue;
            }
            let Some(connection) = connections.get(&sc.connection_id) else {
                // Gone from the directory; reconciliation will deactivate it.
                debug!(stream_connection_id = %sc.id, "Connection missing from directory, skipping");
                continue;
            };

            let provider = connection.provider;
            let Some(registration) = self.registry.get(provider) else {
                debug!(%provider, "No adapter registered, skipping");
                report.connections.push(ConnectionReport {
                    stream_connection_id: sc.id,
                    provider,
                    outcome: ConnectionOutcome::UnknownProvider,
                });
                continue;
            };

            let outcome = match self.is_connection_due(&stream, &sc, provider).await {
                Ok(false) => ConnectionOutcome::Skipped,
                Ok(true) => {
                    match self
                        .sync_connection(&sc, connection, registration)
                        .await
                    {
                        Ok(stats) => {
                            info!(
                                stream_id = %stream.id,
                                %provider,
                                stored = stats.stored,
                                duplicates = stats.duplicates,
                                "Connection sync complete"
                            );
                            ConnectionOutcome::Synced(stats)
                        }
                        Err(error) => {
                            warn!(
                                stream_id = %stream.id,
                                %provider,
                                %error,
                                "Connection sync failed; watermark left unchanged"
                            );
                            ConnectionOutcome::Failed(error)
                        }
                    }
                }
                Err(error) => ConnectionOutcome::Failed(error.into()),
            };
            report.connections.push(ConnectionReport {
                stream_connection_id: sc.id,
                provider,
                outcome,
            });
        }

        let attempted = report.attempted();
        if attempted > 0 && report.failed() == attempted {
            return Err(SyncError::AllConnectionsFailed { failed: attempted });
        }
        Ok(report)
    }

    /// Feed read-back: published items, newest first.
    pub async fn list_feed(&self, user_id: Uuid) -> Result<Vec<StreamItem>, StoreError> {
        let stream = self.store.get_or_create_stream(user_id).await?;
        self.store.list_feed(stream.id).await
    }

    /// Per-connection publish preference.
    pub async fn set_connection_published(
        &self,
        stream_connection_id: Uuid,
        is_published: bool,
    ) -> Result<(), StoreError> {
        self.store
            .set_connection_published(stream_connection_id, is_published)
            .await
    }

    /// Reconcile StreamConnection rows against the directory: create
    /// rows for new connections, deactivate rows whose connection is
    /// gone or inactive.
    pub async fn reconcile(&self, user_id: Uuid) -> Result<(), SyncError> {
        let stream = self.store.get_or_create_stream(user_id).await?;
        let active = self.directory.list_active_connections(user_id).await?;

        let mut seen = HashSet::new();
        for connection in &active {
            self.store
                .upsert_stream_connection(stream.id, connection.id, connection.is_active)
                .await?;
            seen.insert(connection.id);
        }

        for sc in self.store.stream_connections(stream.id).await? {
            if sc.is_active && !seen.contains(&sc.connection_id) {
                self.store
                    .upsert_stream_connection(stream.id, sc.connection_id, false)
                    .await?;
            }
        }
        Ok(())
    }

    /// One background cycle over every active stream; streams run
    /// concurrently, each in its own task.
    pub async fn sync_all_streams(self: &Arc<Self>) -> Result<(), StoreError> {
        let streams = self.store.list_active_streams().await?;
        let mut handles = Vec::with_capacity(streams.len());
        for stream in streams {
            let engine = Arc::clone(self);
            handles.push(tokio::spawn(async move {
                if let Err(error) = engine.run_sync(stream.user_id).await {
                    warn!(stream_id = %stream.id, %error, "Stream sync cycle failed");
                }
            }));
        }
        for handle in handles {
            let _ = handle.await;
        }
        Ok(())
    }

    /// Listen for directory change events and re-run reconciliation for
    /// the affected user. Runs until the directory drops its sender.
    pub async fn run_reconciler(self: Arc<Self>) {
        let mut rx = self.directory.subscribe();
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let user_id = event.connection().user_id;
                    if let Err(error) = self.reconcile(user_id).await {
                        warn!(%user_id, %error, "Connection reconciliation failed");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Reconciler lagged behind directory events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    async fn is_connection_due(
        &self,
        stream: &Stream,
        sc: &StreamConnection,
        provider: Provider,
    ) -> Result<bool, StoreError> {
        if scheduler::is_due(sc, Utc::now()) {
            return Ok(true);
        }
        // First-sync bootstrap: nothing published yet means the window
        // does not apply.
        Ok(self
            .store
            .published_item_count(stream.id, provider)
            .await?
            == 0)
    }

    async fn sync_connection(
        &self,
        sc: &StreamConnection,
        connection: &Connection,
        registration: &ProviderRegistration,
    ) -> Result<ConnectionSyncStats, SyncError> {
        let opts = FetchOptions {
            limit: self.config.fetch_limit,
        };
        let fetch = registration.adapter.fetch_recent(connection, &opts);
        let batch = match tokio::time::timeout(self.config.fetch_timeout, fetch).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(AdapterError::Timeout {
                    provider: connection.provider,
                }
                .into())
            }
        };

        let mut stats = ConnectionSyncStats {
            fetched: batch.posts.len(),
            partial_failures: batch.partial_errors.len(),
            ..Default::default()
        };
        for error in &batch.partial_errors {
            warn!(provider = %connection.provider, %error, "Partial fetch failure");
        }

        for raw in &batch.posts {
            let mut item = match registration.normalizer.normalize(raw, sc, connection) {
                Ok(item) => item,
                Err(error) => {
                    warn!(
                        source_id = raw.source_id(),
                        %error,
                        "Skipping unnormalizable post"
                    );
                    stats.skipped_normalization += 1;
                    continue;
                }
            };

            registration
                .policy
                .annotate(&mut item, raw, connection)
                .await;
            // Connection-level publish preference caps item visibility.
            if !sc.is_published {
                item.is_published = false;
            }

            if self.store.insert_item_if_absent(item).await? {
                stats.stored += 1;
            } else {
                stats.duplicates += 1;
            }
        }

        self.store.advance_watermark(sc.id, Utc::now()).await?;
        Ok(stats)
    }
}
