//! In-memory storage implementation for testing and development.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::traits::store::StreamStore;
use crate::types::{NewStreamItem, Provider, Stream, StreamConnection, StreamItem};

/// In-memory store for streams, stream connections, and items.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart. The natural-key check and insert happen
/// under one write lock, which gives the same at-most-one-insert
/// guarantee the PostgreSQL unique index provides.
#[derive(Default)]
pub struct MemoryStore {
    streams: RwLock<Vec<Stream>>,
    stream_connections: RwLock<Vec<StreamConnection>>,
    items: RwLock<Vec<StreamItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total stored items, published or not.
    pub fn item_count(&self) -> usize {
        self.items.read().unwrap().len()
    }

    /// Fetch one stream connection by id.
    pub fn stream_connection(&self, id: Uuid) -> Option<StreamConnection> {
        self.stream_connections
            .read()
            .unwrap()
            .iter()
            .find(|sc| sc.id == id)
            .cloned()
    }

    pub fn clear(&self) {
        self.streams.write().unwrap().clear();
        self.stream_connections.write().unwrap().clear();
        self.items.write().unwrap().clear();
    }
}

#[async_trait]
impl StreamStore for MemoryStore {
    async fn get_or_create_stream(&self, user_id: Uuid) -> Result<Stream, StoreError> {
        let mut streams = self.streams.write().unwrap();
        if let Some(stream) = streams.iter().find(|s| s.user_id == user_id) {
            return Ok(stream.clone());
        }
        let now = Utc::now();
        let stream = Stream {
            id: Uuid::new_v4(),
            user_id,
            is_published: true,
            is_active: true,
            created: now,
            updated: now,
        };
        streams.push(stream.clone());
        Ok(stream)
    }

    async fn list_active_streams(&self) -> Result<Vec<Stream>, StoreError> {
        Ok(self
            .streams
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }

    async fn stream_connections(
        &self,
        stream_id: Uuid,
    ) -> Result<Vec<StreamConnection>, StoreError> {
        Ok(self
            .stream_connections
            .read()
            .unwrap()
            .iter()
            .filter(|sc| sc.stream_id == stream_id)
            .cloned()
            .collect())
    }

    async fn upsert_stream_connection(
        &self,
        stream_id: Uuid,
        connection_id: Uuid,
        is_active: bool,
    ) -> Result<StreamConnection, StoreError> {
        let mut connections = self.stream_connections.write().unwrap();
        if let Some(sc) = connections
            .iter_mut()
            .find(|sc| sc.stream_id == stream_id && sc.connection_id == connection_id)
        {
            sc.is_active = is_active;
            return Ok(sc.clone());
        }
        let now = Utc::now();
        let sc = StreamConnection {
            id: Uuid::new_v4(),
            stream_id,
            connection_id,
            stream_refresh_hours: 1,
            post_delay_hours: 0,
            is_published: true,
            is_active,
            created: now,
            updated: now,
        };
        connections.push(sc.clone());
        Ok(sc)
    }

    async fn set_connection_published(
        &self,
        stream_connection_id: Uuid,
        is_published: bool,
    ) -> Result<(), StoreError> {
        let mut connections = self.stream_connections.write().unwrap();
        let sc = connections
            .iter_mut()
            .find(|sc| sc.id == stream_connection_id)
            .ok_or(StoreError::MissingStreamConnection(stream_connection_id))?;
        sc.is_published = is_published;
        Ok(())
    }

    async fn insert_item_if_absent(&self, item: NewStreamItem) -> Result<bool, StoreError> {
        let mut items = self.items.write().unwrap();
        let key = item.natural_key();
        if items.iter().any(|existing| {
            (
                existing.stream_id,
                existing.connection_id,
                existing.source_id.as_str(),
                existing.date,
            ) == key
        }) {
            return Ok(false);
        }
        let now = Utc::now();
        items.push(StreamItem {
            id: Uuid::new_v4(),
            stream_id: item.stream_id,
            connection_id: item.connection_id,
            provider: item.provider,
            kind: item.kind,
            date: item.date,
            title: item.title,
            body: item.body,
            permalink: item.permalink,
            source_id: item.source_id,
            picture: item.picture,
            picture_small: item.picture_small,
            picture_medium: item.picture_medium,
            picture_id: item.picture_id,
            street: item.street,
            city: item.city,
            state: item.state,
            country: item.country,
            latitude: item.latitude,
            longitude: item.longitude,
            place_id: item.place_id,
            place_name: item.place_name,
            privacy: item.privacy,
            raw_data: item.raw_data,
            is_published: item.is_published,
            is_active: item.is_active,
            created: now,
            updated: now,
        });
        Ok(true)
    }

    async fn published_item_count(
        &self,
        stream_id: Uuid,
        provider: Provider,
    ) -> Result<u64, StoreError> {
        Ok(self
            .items
            .read()
            .unwrap()
            .iter()
            .filter(|i| i.stream_id == stream_id && i.provider == provider && i.is_published)
            .count() as u64)
    }

    async fn advance_watermark(
        &self,
        stream_connection_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut connections = self.stream_connections.write().unwrap();
        let sc = connections
            .iter_mut()
            .find(|sc| sc.id == stream_connection_id)
            .ok_or(StoreError::MissingStreamConnection(stream_connection_id))?;
        sc.updated = at;
        Ok(())
    }

    async fn list_feed(&self, stream_id: Uuid) -> Result<Vec<StreamItem>, StoreError> {
        let mut feed: Vec<StreamItem> = self
            .items
            .read()
            .unwrap()
            .iter()
            .filter(|i| i.stream_id == stream_id && i.is_published)
            .cloned()
            .collect();
        feed.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(feed)
    }
}
