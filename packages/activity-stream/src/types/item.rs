use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Provider;

/// Canonical item kind across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Status,
    Photo,
    Unknown,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Status => "status",
            ItemKind::Photo => "photo",
            ItemKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ItemKind {
    fn from(tag: &str) -> Self {
        match tag {
            "status" => ItemKind::Status,
            "photo" => ItemKind::Photo,
            _ => ItemKind::Unknown,
        }
    }
}

/// One normalized, deduplicated post in a stream.
///
/// Immutable once persisted, apart from soft deactivation flags; never
/// hard-deleted by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamItem {
    pub id: Uuid,
    pub stream_id: Uuid,
    pub connection_id: Uuid,
    /// Denormalized from the connection for per-provider queries.
    pub provider: Provider,
    pub kind: ItemKind,
    /// Provider-reported timestamp, not ingestion time.
    pub date: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub permalink: String,
    /// Provider-native identifier; unique per provider, not globally.
    pub source_id: String,

    pub picture: Option<String>,
    pub picture_small: Option<String>,
    pub picture_medium: Option<String>,
    pub picture_id: Option<String>,

    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub place_id: Option<String>,
    pub place_name: Option<String>,

    /// Provider-reported visibility level, when one was looked up.
    pub privacy: Option<String>,
    /// Opaque original payload, kept for audit and reprocessing.
    pub raw_data: serde_json::Value,

    pub is_published: bool,
    pub is_active: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Insert payload for a stream item; the store assigns the id and row
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStreamItem {
    pub stream_id: Uuid,
    pub connection_id: Uuid,
    pub provider: Provider,
    pub kind: ItemKind,
    pub date: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub permalink: String,
    pub source_id: String,

    pub picture: Option<String>,
    pub picture_small: Option<String>,
    pub picture_medium: Option<String>,
    pub picture_id: Option<String>,

    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub place_id: Option<String>,
    pub place_name: Option<String>,

    pub privacy: Option<String>,
    pub raw_data: serde_json::Value,

    pub is_published: bool,
    pub is_active: bool,
}

impl NewStreamItem {
    /// Start a canonical item with empty content fields. Normalizers fill
    /// in what the payload provides; publication defaults to true until a
    /// visibility policy says otherwise.
    pub fn new(
        stream_id: Uuid,
        connection_id: Uuid,
        provider: Provider,
        kind: ItemKind,
        date: DateTime<Utc>,
        source_id: String,
    ) -> Self {
        Self {
            stream_id,
            connection_id,
            provider,
            kind,
            date,
            title: String::new(),
            body: String::new(),
            permalink: String::new(),
            source_id,
            picture: None,
            picture_small: None,
            picture_medium: None,
            picture_id: None,
            street: None,
            city: None,
            state: None,
            country: None,
            latitude: None,
            longitude: None,
            place_id: None,
            place_name: None,
            privacy: None,
            raw_data: serde_json::Value::Null,
            is_published: true,
            is_active: true,
        }
    }

    /// The tuple that uniquely identifies an item for ingestion.
    pub fn natural_key(&self) -> (Uuid, Uuid, &str, DateTime<Utc>) {
        (
            self.stream_id,
            self.connection_id,
            self.source_id.as_str(),
            self.date,
        )
    }
}
