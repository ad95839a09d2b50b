//! Mock adapter for testing.
//!
//! Provides a configurable mock implementation of the ProviderAdapter
//! trait: canned posts per connection, injectable failures, recorded
//! calls.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AdapterError;
use crate::traits::adapter::{FetchBatch, FetchOptions, ProviderAdapter};
use crate::types::{Connection, Provider, RawPost};

pub struct MockAdapter {
    provider: Provider,
    /// Canned posts keyed by connection id.
    posts: Arc<RwLock<HashMap<Uuid, Vec<RawPost>>>>,
    /// One-shot failures keyed by connection id, taken on the next call.
    failures: Arc<RwLock<HashMap<Uuid, AdapterError>>>,
    /// One-shot partial errors attached to the next successful batch.
    partials: Arc<RwLock<HashMap<Uuid, Vec<AdapterError>>>>,
    /// Connection ids in call order.
    calls: Arc<RwLock<Vec<Uuid>>>,
}

impl MockAdapter {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            posts: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            partials: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Add a post that the next fetches for this connection will return.
    pub fn add_post(&self, connection_id: Uuid, post: RawPost) {
        self.posts
            .write()
            .unwrap()
            .entry(connection_id)
            .or_default()
            .push(post);
    }

    /// Builder form of [`add_post`](Self::add_post).
    pub fn with_posts(self, connection_id: Uuid, posts: Vec<RawPost>) -> Self {
        self.posts.write().unwrap().insert(connection_id, posts);
        self
    }

    /// Make the next fetch for this connection fail.
    pub fn fail_next(&self, connection_id: Uuid, error: AdapterError) {
        self.failures.write().unwrap().insert(connection_id, error);
    }

    /// Attach a sub-collection failure to the next batch, alongside
    /// whatever posts are canned.
    pub fn add_partial_error(&self, connection_id: Uuid, error: AdapterError) {
        self.partials
            .write()
            .unwrap()
            .entry(connection_id)
            .or_default()
            .push(error);
    }

    pub fn fetch_call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn fetch_calls(&self) -> Vec<Uuid> {
        self.calls.read().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

impl Clone for MockAdapter {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider,
            posts: Arc::clone(&self.posts),
            failures: Arc::clone(&self.failures),
            partials: Arc::clone(&self.partials),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    async fn fetch_recent(
        &self,
        connection: &Connection,
        opts: &FetchOptions,
    ) -> Result<FetchBatch, AdapterError> {
        self.calls.write().unwrap().push(connection.id);

        if let Some(error) = self.failures.write().unwrap().remove(&connection.id) {
            return Err(error);
        }

        let posts = self
            .posts
            .read()
            .unwrap()
            .get(&connection.id)
            .map(|p| p.iter().take(opts.limit).cloned().collect())
            .unwrap_or_default();
        let partial_errors = self
            .partials
            .write()
            .unwrap()
            .remove(&connection.id)
            .unwrap_or_default();
        Ok(FetchBatch {
            posts,
            partial_errors,
        })
    }

    fn provider(&self) -> Provider {
        self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn canned_posts_and_call_tracking() {
        let connection = testing::twitter_connection();
        let mock = MockAdapter::new(Provider::Twitter).with_posts(
            connection.id,
            vec![RawPost::Tweet(testing::tweet("1", "hello"))],
        );

        let batch = mock
            .fetch_recent(&connection, &FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(batch.posts.len(), 1);
        assert_eq!(mock.fetch_call_count(), 1);
        assert_eq!(mock.fetch_calls(), vec![connection.id]);
    }

    #[tokio::test]
    async fn injected_failures_fire_once() {
        let connection = testing::twitter_connection();
        let mock = MockAdapter::new(Provider::Twitter);
        mock.fail_next(
            connection.id,
            AdapterError::Api {
                status: 401,
                message: "bad token".into(),
            },
        );

        assert!(mock
            .fetch_recent(&connection, &FetchOptions::default())
            .await
            .is_err());
        assert!(mock
            .fetch_recent(&connection, &FetchOptions::default())
            .await
            .is_ok());
    }
}
