//! Visibility policy implementations, one per provider.

mod facebook;
mod twitter;

// `self::` disambiguates the submodules from the client crates of the
// same name.
pub use self::facebook::{FacebookVisibility, GraphPrivacyLookup, PUBLIC_PRIVACY};
pub use self::twitter::TwitterVisibility;

use async_trait::async_trait;

use crate::traits::policy::VisibilityPolicy;
use crate::types::{Connection, NewStreamItem, RawPost};

/// Publishes everything. Useful for providers without visibility rules
/// and for tests.
pub struct PassthroughVisibility;

#[async_trait]
impl VisibilityPolicy for PassthroughVisibility {
    async fn annotate(
        &self,
        item: &mut NewStreamItem,
        _raw: &RawPost,
        _connection: &Connection,
    ) -> bool {
        item.is_published
    }
}
