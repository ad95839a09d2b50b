//! Facebook publication rules.

use std::sync::Arc;

use async_trait::async_trait;
use facebook::FacebookClient;
use tracing::warn;

use crate::error::PolicyError;
use crate::traits::policy::{PrivacyLookup, VisibilityPolicy};
use crate::types::{Connection, NewStreamItem, RawPost};

/// The only level the Graph API reports for fully public posts.
pub const PUBLIC_PRIVACY: &str = "EVERYONE";

/// Facebook rules: the post must be authored by the connection's own
/// account, and a per-post privacy lookup must report a fully public
/// level. A failed or empty lookup is neutral.
pub struct FacebookVisibility {
    lookup: Arc<dyn PrivacyLookup>,
}

impl FacebookVisibility {
    pub fn new(lookup: Arc<dyn PrivacyLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl VisibilityPolicy for FacebookVisibility {
    async fn annotate(
        &self,
        item: &mut NewStreamItem,
        raw: &RawPost,
        connection: &Connection,
    ) -> bool {
        let author = match raw {
            RawPost::FacebookStatus(status) => status.from.as_ref(),
            RawPost::FacebookPhoto(photo) => photo.from.as_ref(),
            _ => None,
        };

        // Shared/tagged posts carry someone else's author id; they never
        // belong in the owner's published feed.
        if let Some(author) = author {
            if author.id != connection.external_account_id {
                item.is_published = false;
                return false;
            }
        }

        match self.lookup.post_privacy(connection, &item.source_id).await {
            Ok(Some(level)) => {
                if level != PUBLIC_PRIVACY {
                    item.is_published = false;
                }
                item.privacy = Some(level);
            }
            Ok(None) => {}
            Err(error) => {
                warn!(
                    post_id = %item.source_id,
                    %error,
                    "Privacy lookup failed; leaving publication state unchanged"
                );
            }
        }
        item.is_published
    }
}

/// Graph API-backed lookup used in production wiring.
pub struct GraphPrivacyLookup;

#[async_trait]
impl PrivacyLookup for GraphPrivacyLookup {
    async fn post_privacy(
        &self,
        connection: &Connection,
        post_id: &str,
    ) -> Result<Option<String>, PolicyError> {
        let client = FacebookClient::new(connection.token.clone());
        let privacy = client
            .post_privacy(post_id)
            .await
            .map_err(|e| PolicyError::Lookup(Box::new(e)))?;
        Ok(privacy.map(|p| p.value))
    }
}
