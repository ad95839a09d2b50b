//! Facebook adapter: merges status updates and uploaded photos.

use async_trait::async_trait;
use facebook::{FacebookClient, FacebookError};
use tracing::{debug, warn};

use crate::error::AdapterError;
use crate::traits::adapter::{FetchBatch, FetchOptions, ProviderAdapter};
use crate::types::{Connection, Provider, RawPost};

/// Fetches two independent collections per cycle. A failure in one
/// collection is carried as a partial error so the other still lands.
#[derive(Default)]
pub struct FacebookAdapter;

impl FacebookAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn adapter_error(err: FacebookError) -> AdapterError {
    match err {
        FacebookError::Api { status, message } => AdapterError::Api { status, message },
        FacebookError::Request(e) => AdapterError::Http(Box::new(e)),
    }
}

#[async_trait]
impl ProviderAdapter for FacebookAdapter {
    async fn fetch_recent(
        &self,
        connection: &Connection,
        opts: &FetchOptions,
    ) -> Result<FetchBatch, AdapterError> {
        let client = FacebookClient::new(connection.token.clone());
        let account = connection.external_account_id.as_str();
        let limit = opts.limit as u32;

        let mut batch = FetchBatch::default();

        match client.statuses(account, limit).await {
            Ok(statuses) => batch
                .posts
                .extend(statuses.into_iter().map(RawPost::FacebookStatus)),
            Err(error) => {
                warn!(account, %error, "Facebook status fetch failed");
                batch.partial_errors.push(adapter_error(error));
            }
        }

        match client.photos(account, limit).await {
            Ok(photos) => batch
                .posts
                .extend(photos.into_iter().map(RawPost::FacebookPhoto)),
            Err(error) => {
                warn!(account, %error, "Facebook photo fetch failed");
                batch.partial_errors.push(adapter_error(error));
            }
        }

        // Both collections down means the invocation as a whole failed.
        if batch.partial_errors.len() == 2 {
            return Err(batch.partial_errors.remove(0));
        }

        debug!(
            account,
            posts = batch.posts.len(),
            partial = batch.is_partial(),
            "Fetched Facebook collections"
        );
        Ok(batch)
    }

    fn provider(&self) -> Provider {
        Provider::Facebook
    }
}
