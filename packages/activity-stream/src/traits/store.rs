//! Abstract persistence boundary for streams, connections, and items.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{NewStreamItem, Provider, Stream, StreamConnection, StreamItem};

/// Storage operations the engine needs.
///
/// The uniqueness of the item natural key (stream, connection,
/// source_id, date) is the engine's only required synchronization
/// primitive: `insert_item_if_absent` must be atomic under concurrent
/// writers with the same key.
#[async_trait]
pub trait StreamStore: Send + Sync {
    /// Fetch the user's stream, creating it on first access.
    async fn get_or_create_stream(&self, user_id: Uuid) -> Result<Stream, StoreError>;

    async fn list_active_streams(&self) -> Result<Vec<Stream>, StoreError>;

    /// All stream connections for a stream, active or not.
    async fn stream_connections(
        &self,
        stream_id: Uuid,
    ) -> Result<Vec<StreamConnection>, StoreError>;

    /// Create the (stream, connection) row if missing, then set its
    /// active flag. Never touches the watermark.
    async fn upsert_stream_connection(
        &self,
        stream_id: Uuid,
        connection_id: Uuid,
        is_active: bool,
    ) -> Result<StreamConnection, StoreError>;

    /// Per-connection publish preference.
    async fn set_connection_published(
        &self,
        stream_connection_id: Uuid,
        is_published: bool,
    ) -> Result<(), StoreError>;

    /// Insert-or-ignore on the natural key. Returns true when the item
    /// was stored, false when an item with the same key already existed.
    /// Existing rows are never mutated.
    async fn insert_item_if_absent(&self, item: NewStreamItem) -> Result<bool, StoreError>;

    /// Published item count for one provider within a stream.
    async fn published_item_count(
        &self,
        stream_id: Uuid,
        provider: Provider,
    ) -> Result<u64, StoreError>;

    /// Advance a stream connection's watermark after a successful sync.
    async fn advance_watermark(
        &self,
        stream_connection_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Published items, newest first.
    async fn list_feed(&self, stream_id: Uuid) -> Result<Vec<StreamItem>, StoreError>;
}
