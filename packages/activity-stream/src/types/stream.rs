use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's aggregated activity feed container, with a global
/// `is_published` on/off switch. Exactly one per user, created lazily
/// on first access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stream {
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_published: bool,
    pub is_active: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Per-connection sync preferences and state for one stream.
///
/// At most one row per (stream, connection) pair; reconciled whenever
/// the directory's set of active connections changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConnection {
    pub id: Uuid,
    pub stream_id: Uuid,
    pub connection_id: Uuid,
    /// Minimum hours between syncs.
    pub stream_refresh_hours: i64,
    /// Hours before a sync is even considered stale (staggers perceived
    /// freshness).
    pub post_delay_hours: i64,
    pub is_published: bool,
    pub is_active: bool,
    pub created: DateTime<Utc>,
    /// Watermark: completion time of the last successful sync.
    pub updated: DateTime<Utc>,
}
