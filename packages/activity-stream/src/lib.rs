//! Provider-Agnostic Activity Stream Engine
//!
//! Aggregates a user's posts from external social providers into one
//! chronologically ordered feed. The engine decides when to pull from a
//! provider, converts each provider's payload into a canonical item,
//! deduplicates against previously stored items on a natural key, and
//! applies per-item visibility rules.
//!
//! # Design
//!
//! - Providers plug in as {adapter, normalizer, policy} registrations;
//!   unknown provider tags are skipped, never errors
//! - Normalization is pure; the one per-item network side effect
//!   (Facebook's privacy lookup) lives behind a policy trait
//! - The store's natural-key uniqueness is the only synchronization
//!   primitive; re-ingestion is idempotent under concurrent triggers
//! - Refresh windows gate each connection; a failed sync leaves the
//!   watermark alone so the next cycle retries
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use activity_stream::{
//!     FacebookAdapter, FacebookVisibility, GraphPrivacyLookup, InMemoryDirectory,
//!     MemoryStore, Normalizer, ProviderRegistry, SyncEngine, TwitterAdapter,
//!     TwitterVisibility,
//! };
//!
//! let registry = ProviderRegistry::new()
//!     .with(
//!         Arc::new(TwitterAdapter::new()),
//!         Normalizer::utc(),
//!         Arc::new(TwitterVisibility),
//!     )
//!     .with(
//!         Arc::new(FacebookAdapter::new()),
//!         Normalizer::utc(),
//!         Arc::new(FacebookVisibility::new(Arc::new(GraphPrivacyLookup))),
//!     );
//!
//! let engine = SyncEngine::new(store, directory, registry);
//! engine.reconcile(user_id).await?;
//! let report = engine.run_sync(user_id).await?;
//! let feed = engine.list_feed(user_id).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (adapters, store, policy, directory)
//! - [`types`] - Canonical data types
//! - [`adapters`] - Provider adapters (Twitter, Facebook, mock)
//! - [`normalize`] - Payload → canonical item conversion
//! - [`policy`] - Per-provider visibility rules
//! - [`stores`] - Storage implementations (memory, PostgreSQL)
//! - [`testing`] - Mock collaborators and fixtures for tests

pub mod adapters;
pub mod directory;
pub mod error;
pub mod normalize;
pub mod policy;
pub mod registry;
pub mod scheduler;
pub mod stores;
pub mod sync;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use adapters::{FacebookAdapter, MockAdapter, TwitterAdapter};
pub use directory::InMemoryDirectory;
pub use error::{
    AdapterError, DirectoryError, NormalizeError, PolicyError, StoreError, SyncError,
};
pub use normalize::Normalizer;
pub use policy::{
    FacebookVisibility, GraphPrivacyLookup, PassthroughVisibility, TwitterVisibility,
    PUBLIC_PRIVACY,
};
pub use registry::{ProviderRegistration, ProviderRegistry};
pub use stores::MemoryStore;
pub use sync::{
    ConnectionOutcome, ConnectionReport, ConnectionSyncStats, SyncConfig, SyncEngine, SyncReport,
};
pub use traits::{
    adapter::{FetchBatch, FetchOptions, ProviderAdapter},
    directory::ConnectionDirectory,
    policy::{PrivacyLookup, VisibilityPolicy},
    store::StreamStore,
};
pub use types::{
    Connection, ConnectionEvent, ItemKind, NewStreamItem, Provider, RawPost, Stream,
    StreamConnection, StreamItem,
};

#[cfg(feature = "postgres")]
pub use stores::PgStore;
