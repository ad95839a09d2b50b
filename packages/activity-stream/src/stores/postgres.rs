//! PostgreSQL storage implementation.
//!
//! The production backend. Dedup safety under concurrent writers comes
//! from a unique index on the item natural key with insert-or-ignore
//! semantics, not from read-then-write. The schema is created with
//! idempotent migrations run at construction time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::StoreError;
use crate::traits::store::StreamStore;
use crate::types::{
    ItemKind, NewStreamItem, Provider, Stream, StreamConnection, StreamItem,
};

/// PostgreSQL-backed stream store.
pub struct PgStore {
    pool: PgPool,
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string().into())
}

impl PgStore {
    /// Create a new store with the given connection URL.
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(backend)?;
        Self::from_pool(pool).await
    }

    /// Create a store from an existing connection pool. Use this when
    /// the application already has a `PgPool`.
    pub async fn from_pool(pool: PgPool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS streams (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL UNIQUE,
                is_published BOOLEAN NOT NULL DEFAULT TRUE,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stream_connections (
                id UUID PRIMARY KEY,
                stream_id UUID NOT NULL REFERENCES streams(id),
                connection_id UUID NOT NULL,
                stream_refresh_hours BIGINT NOT NULL DEFAULT 1,
                post_delay_hours BIGINT NOT NULL DEFAULT 0,
                is_published BOOLEAN NOT NULL DEFAULT TRUE,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (stream_id, connection_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stream_items (
                id UUID PRIMARY KEY,
                stream_id UUID NOT NULL REFERENCES streams(id),
                connection_id UUID NOT NULL,
                provider TEXT NOT NULL,
                kind TEXT NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                permalink TEXT NOT NULL,
                source_id TEXT NOT NULL,
                picture TEXT,
                picture_small TEXT,
                picture_medium TEXT,
                picture_id TEXT,
                street TEXT,
                city TEXT,
                state TEXT,
                country TEXT,
                latitude DOUBLE PRECISION,
                longitude DOUBLE PRECISION,
                place_id TEXT,
                place_name TEXT,
                privacy TEXT,
                raw_data JSONB NOT NULL,
                is_published BOOLEAN NOT NULL DEFAULT TRUE,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (stream_id, connection_id, source_id, date)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_stream_items_feed
             ON stream_items (stream_id, is_published, date DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }
}

#[derive(FromRow)]
struct StreamRow {
    id: Uuid,
    user_id: Uuid,
    is_published: bool,
    is_active: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl From<StreamRow> for Stream {
    fn from(row: StreamRow) -> Self {
        Stream {
            id: row.id,
            user_id: row.user_id,
            is_published: row.is_published,
            is_active: row.is_active,
            created: row.created,
            updated: row.updated,
        }
    }
}

#[derive(FromRow)]
struct StreamConnectionRow {
    id: Uuid,
    stream_id: Uuid,
    connection_id: Uuid,
    stream_refresh_hours: i64,
    post_delay_hours: i64,
    is_published: bool,
    is_active: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl From<StreamConnectionRow> for StreamConnection {
    fn from(row: StreamConnectionRow) -> Self {
        StreamConnection {
            id: row.id,
            stream_id: row.stream_id,
            connection_id: row.connection_id,
            stream_refresh_hours: row.stream_refresh_hours,
            post_delay_hours: row.post_delay_hours,
            is_published: row.is_published,
            is_active: row.is_active,
            created: row.created,
            updated: row.updated,
        }
    }
}

#[derive(FromRow)]
struct StreamItemRow {
    id: Uuid,
    stream_id: Uuid,
    connection_id: Uuid,
    provider: String,
    kind: String,
    date: DateTime<Utc>,
    title: String,
    body: String,
    permalink: String,
    source_id: String,
    picture: Option<String>,
    picture_small: Option<String>,
    picture_medium: Option<String>,
    picture_id: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    place_id: Option<String>,
    place_name: Option<String>,
    privacy: Option<String>,
    raw_data: serde_json::Value,
    is_published: bool,
    is_active: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl From<StreamItemRow> for StreamItem {
    fn from(row: StreamItemRow) -> Self {
        StreamItem {
            id: row.id,
            stream_id: row.stream_id,
            connection_id: row.connection_id,
            provider: Provider::from(row.provider.as_str()),
            kind: ItemKind::from(row.kind.as_str()),
            date: row.date,
            title: row.title,
            body: row.body,
            permalink: row.permalink,
            source_id: row.source_id,
            picture: row.picture,
            picture_small: row.picture_small,
            picture_medium: row.picture_medium,
            picture_id: row.picture_id,
            street: row.street,
            city: row.city,
            state: row.state,
            country: row.country,
            latitude: row.latitude,
            longitude: row.longitude,
            place_id: row.place_id,
            place_name: row.place_name,
            privacy: row.privacy,
            raw_data: row.raw_data,
            is_published: row.is_published,
            is_active: row.is_active,
            created: row.created,
            updated: row.updated,
        }
    }
}

#[async_trait]
impl StreamStore for PgStore {
    async fn get_or_create_stream(&self, user_id: Uuid) -> Result<Stream, StoreError> {
        sqlx::query("INSERT INTO streams (id, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
            .bind(Uuid::new_v4())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        let row = sqlx::query_as::<_, StreamRow>("SELECT * FROM streams WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.into())
    }

    async fn list_active_streams(&self) -> Result<Vec<Stream>, StoreError> {
        let rows =
            sqlx::query_as::<_, StreamRow>("SELECT * FROM streams WHERE is_active = TRUE")
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn stream_connections(
        &self,
        stream_id: Uuid,
    ) -> Result<Vec<StreamConnection>, StoreError> {
        let rows = sqlx::query_as::<_, StreamConnectionRow>(
            "SELECT * FROM stream_connections WHERE stream_id = $1",
        )
        .bind(stream_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert_stream_connection(
        &self,
        stream_id: Uuid,
        connection_id: Uuid,
        is_active: bool,
    ) -> Result<StreamConnection, StoreError> {
        let row = sqlx::query_as::<_, StreamConnectionRow>(
            r#"
            INSERT INTO stream_connections (id, stream_id, connection_id, is_active)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (stream_id, connection_id)
            DO UPDATE SET is_active = EXCLUDED.is_active
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(stream_id)
        .bind(connection_id)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.into())
    }

    async fn set_connection_published(
        &self,
        stream_connection_id: Uuid,
        is_published: bool,
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE stream_connections SET is_published = $2 WHERE id = $1")
                .bind(stream_connection_id)
                .bind(is_published)
                .execute(&self.pool)
                .await
                .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::MissingStreamConnection(stream_connection_id));
        }
        Ok(())
    }

    async fn insert_item_if_absent(&self, item: NewStreamItem) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO stream_items (
                id, stream_id, connection_id, provider, kind, date,
                title, body, permalink, source_id,
                picture, picture_small, picture_medium, picture_id,
                street, city, state, country, latitude, longitude,
                place_id, place_name, privacy, raw_data,
                is_published, is_active
            )
            VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10,
                $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24,
                $25, $26
            )
            ON CONFLICT (stream_id, connection_id, source_id, date) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item.stream_id)
        .bind(item.connection_id)
        .bind(item.provider.as_str())
        .bind(item.kind.as_str())
        .bind(item.date)
        .bind(&item.title)
        .bind(&item.body)
        .bind(&item.permalink)
        .bind(&item.source_id)
        .bind(&item.picture)
        .bind(&item.picture_small)
        .bind(&item.picture_medium)
        .bind(&item.picture_id)
        .bind(&item.street)
        .bind(&item.city)
        .bind(&item.state)
        .bind(&item.country)
        .bind(item.latitude)
        .bind(item.longitude)
        .bind(&item.place_id)
        .bind(&item.place_name)
        .bind(&item.privacy)
        .bind(&item.raw_data)
        .bind(item.is_published)
        .bind(item.is_active)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(result.rows_affected() == 1)
    }

    async fn published_item_count(
        &self,
        stream_id: Uuid,
        provider: Provider,
    ) -> Result<u64, StoreError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM stream_items
             WHERE stream_id = $1 AND provider = $2 AND is_published = TRUE",
        )
        .bind(stream_id)
        .bind(provider.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;
        Ok(count as u64)
    }

    async fn advance_watermark(
        &self,
        stream_connection_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE stream_connections SET updated = $2 WHERE id = $1")
            .bind(stream_connection_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::MissingStreamConnection(stream_connection_id));
        }
        Ok(())
    }

    async fn list_feed(&self, stream_id: Uuid) -> Result<Vec<StreamItem>, StoreError> {
        let rows = sqlx::query_as::<_, StreamItemRow>(
            "SELECT * FROM stream_items
             WHERE stream_id = $1 AND is_published = TRUE
             ORDER BY date DESC",
        )
        .bind(stream_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
