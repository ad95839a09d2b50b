//! Twitter adapter: wraps the timeline API into uniform raw posts.

use async_trait::async_trait;
use tracing::debug;
use twitter::{TimelineOptions, TwitterClient, TwitterError};

use crate::error::AdapterError;
use crate::traits::adapter::{FetchBatch, FetchOptions, ProviderAdapter};
use crate::types::{Connection, Provider, RawPost};

/// Fetches an account's recent timeline, excluding replies and reshares.
#[derive(Default)]
pub struct TwitterAdapter;

impl TwitterAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn adapter_error(err: TwitterError) -> AdapterError {
    match err {
        TwitterError::Api { status, message } => AdapterError::Api { status, message },
        TwitterError::Request(e) => AdapterError::Http(Box::new(e)),
    }
}

#[async_trait]
impl ProviderAdapter for TwitterAdapter {
    async fn fetch_recent(
        &self,
        connection: &Connection,
        opts: &FetchOptions,
    ) -> Result<FetchBatch, AdapterError> {
        let client = TwitterClient::new(connection.token.clone());
        let timeline = TimelineOptions {
            count: opts.limit as u32,
            exclude_replies: true,
            include_rts: false,
        };

        let tweets = client
            .user_timeline(&connection.username, &timeline)
            .await
            .map_err(adapter_error)?;

        debug!(
            username = %connection.username,
            count = tweets.len(),
            "Fetched Twitter timeline"
        );
        Ok(FetchBatch::complete(
            tweets.into_iter().map(RawPost::Tweet).collect(),
        ))
    }

    fn provider(&self) -> Provider {
        Provider::Twitter
    }
}
