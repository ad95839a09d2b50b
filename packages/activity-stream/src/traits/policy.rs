//! Per-item publication rules, pluggable per provider.

use async_trait::async_trait;

use crate::error::PolicyError;
use crate::types::{Connection, NewStreamItem, RawPost};

/// Decides whether a normalized item may be published.
///
/// Async because some providers need a per-item network lookup. A
/// policy only ever narrows visibility: items start published and a
/// rule violation flips them off.
#[async_trait]
pub trait VisibilityPolicy: Send + Sync {
    /// Annotate the item in place and return its publication state.
    async fn annotate(
        &self,
        item: &mut NewStreamItem,
        raw: &RawPost,
        connection: &Connection,
    ) -> bool;
}

/// Secondary per-post privacy lookup (Facebook). Behind a trait so
/// tests inject canned levels instead of the Graph API.
#[async_trait]
pub trait PrivacyLookup: Send + Sync {
    /// The post's visibility level, `None` when the provider has no
    /// answer for it.
    async fn post_privacy(
        &self,
        connection: &Connection,
        post_id: &str,
    ) -> Result<Option<String>, PolicyError>;
}
