//! End-to-end orchestration tests against the in-memory store and the
//! mock adapter.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use activity_stream::testing;
use activity_stream::{
    AdapterError, Connection, ConnectionOutcome, InMemoryDirectory, MemoryStore, MockAdapter,
    Normalizer, PassthroughVisibility, Provider, ProviderRegistry, RawPost, StreamStore,
    SyncEngine, SyncError, TwitterVisibility,
};

struct Harness {
    engine: Arc<SyncEngine>,
    store: Arc<MemoryStore>,
    directory: Arc<InMemoryDirectory>,
    adapter: MockAdapter,
    connection: Connection,
    user_id: Uuid,
}

/// One user, one active Twitter connection, mock adapter, reconciled
/// stream connections.
async fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let connection = testing::twitter_connection();
    let user_id = connection.user_id;
    let directory = Arc::new(InMemoryDirectory::with_connections(vec![
        connection.clone()
    ]));
    let adapter = MockAdapter::new(Provider::Twitter);

    let registry = ProviderRegistry::new().with(
        Arc::new(adapter.clone()),
        Normalizer::utc(),
        Arc::new(TwitterVisibility),
    );
    let engine = Arc::new(SyncEngine::new(
        store.clone(),
        directory.clone(),
        registry,
    ));
    engine.reconcile(user_id).await.unwrap();

    Harness {
        engine,
        store,
        directory,
        adapter,
        connection,
        user_id,
    }
}

fn tweet_at(id: &str, text: &str, created_at: &str) -> RawPost {
    let mut tweet = testing::tweet(id, text);
    tweet.created_at = created_at.to_string();
    RawPost::Tweet(tweet)
}

#[tokio::test]
async fn end_to_end_sync_stores_dedupes_and_orders() {
    let h = harness().await;
    let stream = h.store.get_or_create_stream(h.user_id).await.unwrap();
    let sc = h.store.stream_connections(stream.id).await.unwrap()[0].clone();

    let oldest = tweet_at("100", "first", "Sun May 01 08:00:00 +0000 2016");
    let middle = tweet_at("101", "second", "Sun May 01 09:00:00 +0000 2016");
    let newest = tweet_at("102", "third", "Sun May 01 10:00:00 +0000 2016");

    // One post already landed in a prior partial run.
    let seeded = testing::normalized(&middle, &sc, &h.connection);
    assert!(h.store.insert_item_if_absent(seeded).await.unwrap());

    h.adapter.add_post(h.connection.id, oldest);
    h.adapter.add_post(h.connection.id, middle);
    h.adapter.add_post(h.connection.id, newest);

    let before = Utc::now();
    let report = h.engine.run_sync(h.user_id).await.unwrap();

    assert_eq!(report.stored(), 2);
    assert_eq!(h.store.item_count(), 3);

    let sc_after = h.store.stream_connection(sc.id).unwrap();
    assert!(sc_after.updated >= before);

    let feed = h.engine.list_feed(h.user_id).await.unwrap();
    let ids: Vec<&str> = feed.iter().map(|i| i.source_id.as_str()).collect();
    assert_eq!(ids, vec!["102", "101", "100"]);
}

#[tokio::test]
async fn reingestion_is_idempotent() {
    let h = harness().await;
    h.adapter
        .add_post(h.connection.id, tweet_at("1", "only", "Sun May 01 08:00:00 +0000 2016"));

    let first = h.engine.run_sync(h.user_id).await.unwrap();
    assert_eq!(first.stored(), 1);

    // Reopen the window so the same payload is fetched again.
    let stream = h.store.get_or_create_stream(h.user_id).await.unwrap();
    let sc = h.store.stream_connections(stream.id).await.unwrap()[0].clone();
    h.store
        .advance_watermark(sc.id, Utc::now() - Duration::hours(3))
        .await
        .unwrap();

    let second = h.engine.run_sync(h.user_id).await.unwrap();
    assert_eq!(second.stored(), 0);
    assert_eq!(h.store.item_count(), 1);
}

#[tokio::test]
async fn within_window_sync_is_skipped_once_items_exist() {
    let h = harness().await;
    h.adapter
        .add_post(h.connection.id, tweet_at("1", "hi", "Sun May 01 08:00:00 +0000 2016"));

    h.engine.run_sync(h.user_id).await.unwrap();
    assert_eq!(h.adapter.fetch_call_count(), 1);

    // Watermark is fresh and items exist, so the second cycle skips.
    let report = h.engine.run_sync(h.user_id).await.unwrap();
    assert_eq!(h.adapter.fetch_call_count(), 1);
    assert!(matches!(
        report.connections[0].outcome,
        ConnectionOutcome::Skipped
    ));
}

#[tokio::test]
async fn bootstrap_syncs_even_inside_the_window() {
    let h = harness().await;
    // Fresh watermark, but zero stored items: still due.
    let report = h.engine.run_sync(h.user_id).await.unwrap();
    assert!(matches!(
        report.connections[0].outcome,
        ConnectionOutcome::Synced(_)
    ));
    assert_eq!(h.adapter.fetch_call_count(), 1);
}

#[tokio::test]
async fn failed_sync_leaves_the_watermark_for_retry() {
    let h = harness().await;
    let stream = h.store.get_or_create_stream(h.user_id).await.unwrap();
    let sc = h.store.stream_connections(stream.id).await.unwrap()[0].clone();
    let watermark = sc.updated;

    h.adapter.fail_next(
        h.connection.id,
        AdapterError::Api {
            status: 503,
            message: "over capacity".into(),
        },
    );

    // The only attempted connection failed, so the aggregate errors.
    let result = h.engine.run_sync(h.user_id).await;
    assert!(matches!(
        result,
        Err(SyncError::AllConnectionsFailed { failed: 1 })
    ));

    let sc_after = h.store.stream_connection(sc.id).unwrap();
    assert_eq!(sc_after.updated, watermark);

    // Next cycle retries and succeeds.
    h.adapter
        .add_post(h.connection.id, tweet_at("9", "back", "Sun May 01 08:00:00 +0000 2016"));
    let report = h.engine.run_sync(h.user_id).await.unwrap();
    assert_eq!(report.stored(), 1);
}

#[tokio::test]
async fn one_failing_connection_is_partial_success() {
    let store = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();

    let mut twitter_conn = testing::twitter_connection();
    twitter_conn.user_id = user_id;
    let mut facebook_conn = testing::facebook_connection();
    facebook_conn.user_id = user_id;

    let directory = Arc::new(InMemoryDirectory::with_connections(vec![
        twitter_conn.clone(),
        facebook_conn.clone(),
    ]));

    let twitter_adapter = MockAdapter::new(Provider::Twitter);
    let facebook_adapter = MockAdapter::new(Provider::Facebook);
    twitter_adapter.add_post(
        twitter_conn.id,
        tweet_at("1", "fine", "Sun May 01 08:00:00 +0000 2016"),
    );
    facebook_adapter.fail_next(
        facebook_conn.id,
        AdapterError::Api {
            status: 401,
            message: "expired token".into(),
        },
    );

    let registry = ProviderRegistry::new()
        .with(
            Arc::new(twitter_adapter),
            Normalizer::utc(),
            Arc::new(TwitterVisibility),
        )
        .with(
            Arc::new(facebook_adapter),
            Normalizer::utc(),
            Arc::new(PassthroughVisibility),
        );
    let engine = SyncEngine::new(store.clone(), directory, registry);
    engine.reconcile(user_id).await.unwrap();

    let report = engine.run_sync(user_id).await.unwrap();
    assert_eq!(report.stored(), 1);

    let failed = report
        .connections
        .iter()
        .filter(|c| matches!(c.outcome, ConnectionOutcome::Failed(_)))
        .count();
    assert_eq!(failed, 1);
}

#[tokio::test]
async fn partial_fetch_failure_still_ingests_the_surviving_posts() {
    let h = harness().await;
    h.adapter
        .add_post(h.connection.id, tweet_at("1", "ok", "Sun May 01 08:00:00 +0000 2016"));
    h.adapter
        .add_post(h.connection.id, tweet_at("2", "also ok", "Sun May 01 09:00:00 +0000 2016"));
    h.adapter.add_partial_error(
        h.connection.id,
        AdapterError::Api {
            status: 500,
            message: "photos edge down".into(),
        },
    );

    let report = h.engine.run_sync(h.user_id).await.unwrap();
    assert_eq!(report.stored(), 2);
    match &report.connections[0].outcome {
        ConnectionOutcome::Synced(stats) => assert_eq!(stats.partial_failures, 1),
        other => panic!("expected a synced outcome, got {:?}", other),
    }

    // The watermark advanced: a partial batch is still a successful sync.
    let stream = h.store.get_or_create_stream(h.user_id).await.unwrap();
    let sc = &h.store.stream_connections(stream.id).await.unwrap()[0];
    assert!(Utc::now() - sc.updated < Duration::minutes(1));
}

#[tokio::test]
async fn unregistered_providers_are_skipped_silently() {
    let store = Arc::new(MemoryStore::new());
    let connection = testing::facebook_connection();
    let user_id = connection.user_id;
    let directory = Arc::new(InMemoryDirectory::with_connections(vec![connection]));

    // Registry only knows Twitter; the Facebook connection is a no-op.
    let registry = ProviderRegistry::new().with(
        Arc::new(MockAdapter::new(Provider::Twitter)),
        Normalizer::utc(),
        Arc::new(TwitterVisibility),
    );
    let engine = SyncEngine::new(store, directory, registry);
    engine.reconcile(user_id).await.unwrap();

    let report = engine.run_sync(user_id).await.unwrap();
    assert!(matches!(
        report.connections[0].outcome,
        ConnectionOutcome::UnknownProvider
    ));
}

#[tokio::test]
async fn reconciliation_tracks_directory_changes() {
    let h = harness().await;
    let stream = h.store.get_or_create_stream(h.user_id).await.unwrap();
    assert_eq!(h.store.stream_connections(stream.id).await.unwrap().len(), 1);

    // A second connection appears for the same user.
    let mut second = testing::facebook_connection();
    second.user_id = h.user_id;
    h.directory.upsert(second.clone());
    h.engine.reconcile(h.user_id).await.unwrap();

    let connections = h.store.stream_connections(stream.id).await.unwrap();
    assert_eq!(connections.len(), 2);
    assert!(connections.iter().all(|sc| sc.is_active));

    // The original connection goes away.
    h.directory.remove(h.connection.id);
    h.engine.reconcile(h.user_id).await.unwrap();

    let connections = h.store.stream_connections(stream.id).await.unwrap();
    let orphaned = connections
        .iter()
        .find(|sc| sc.connection_id == h.connection.id)
        .unwrap();
    assert!(!orphaned.is_active);
}

#[tokio::test]
async fn reconciler_task_reacts_to_events() {
    let h = harness().await;
    let reconciler = tokio::spawn(Arc::clone(&h.engine).run_reconciler());
    // Give the task a beat to subscribe before the first event fires.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let mut second = testing::facebook_connection();
    second.user_id = h.user_id;
    h.directory.upsert(second.clone());

    // The broadcast hop is in-process; poll briefly for the new row.
    let stream = h.store.get_or_create_stream(h.user_id).await.unwrap();
    let mut found = false;
    for _ in 0..50 {
        let connections = h.store.stream_connections(stream.id).await.unwrap();
        if connections.iter().any(|sc| sc.connection_id == second.id) {
            found = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(found, "reconciler never created the stream connection");

    reconciler.abort();
}

#[tokio::test]
async fn unpublished_connections_suppress_new_items() {
    let h = harness().await;
    let stream = h.store.get_or_create_stream(h.user_id).await.unwrap();
    let sc = h.store.stream_connections(stream.id).await.unwrap()[0].clone();
    h.engine
        .set_connection_published(sc.id, false)
        .await
        .unwrap();

    h.adapter
        .add_post(h.connection.id, tweet_at("1", "muted", "Sun May 01 08:00:00 +0000 2016"));
    let report = h.engine.run_sync(h.user_id).await.unwrap();

    assert_eq!(report.stored(), 1);
    assert!(h.engine.list_feed(h.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn stalled_fetches_fail_with_a_timeout() {
    use activity_stream::{FetchBatch, FetchOptions, ProviderAdapter, SyncConfig};
    use async_trait::async_trait;

    struct StalledAdapter;

    #[async_trait]
    impl ProviderAdapter for StalledAdapter {
        async fn fetch_recent(
            &self,
            _connection: &Connection,
            _opts: &FetchOptions,
        ) -> Result<FetchBatch, AdapterError> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(FetchBatch::default())
        }

        fn provider(&self) -> Provider {
            Provider::Twitter
        }
    }

    let store = Arc::new(MemoryStore::new());
    let connection = testing::twitter_connection();
    let user_id = connection.user_id;
    let directory = Arc::new(InMemoryDirectory::with_connections(vec![connection]));

    let registry = ProviderRegistry::new().with(
        Arc::new(StalledAdapter),
        Normalizer::utc(),
        Arc::new(TwitterVisibility),
    );
    let engine = SyncEngine::new(store, directory, registry).with_config(SyncConfig {
        fetch_timeout: std::time::Duration::from_millis(50),
        fetch_limit: 30,
    });
    engine.reconcile(user_id).await.unwrap();

    let result = engine.run_sync(user_id).await;
    assert!(matches!(
        result,
        Err(SyncError::AllConnectionsFailed { failed: 1 })
    ));
}
