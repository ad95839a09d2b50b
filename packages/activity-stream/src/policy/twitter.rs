//! Twitter publication rules.

use async_trait::async_trait;

use crate::traits::policy::VisibilityPolicy;
use crate::types::{Connection, NewStreamItem, RawPost};

/// Items from a protected account are never published.
pub struct TwitterVisibility;

#[async_trait]
impl VisibilityPolicy for TwitterVisibility {
    async fn annotate(
        &self,
        item: &mut NewStreamItem,
        raw: &RawPost,
        _connection: &Connection,
    ) -> bool {
        if let RawPost::Tweet(tweet) = raw {
            if tweet.user.protected {
                item.is_published = false;
            }
        }
        item.is_published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn protected_accounts_are_never_published() {
        let connection = testing::twitter_connection();
        let sc = testing::stream_connection(&connection);
        let mut tweet = testing::tweet("1", "secret");
        tweet.user.protected = true;
        let raw = RawPost::Tweet(tweet);

        let mut item = testing::normalized(&raw, &sc, &connection);
        let published = TwitterVisibility.annotate(&mut item, &raw, &connection).await;

        assert!(!published);
        assert!(!item.is_published);
    }

    #[tokio::test]
    async fn open_accounts_publish() {
        let connection = testing::twitter_connection();
        let sc = testing::stream_connection(&connection);
        let raw = RawPost::Tweet(testing::tweet("2", "public"));

        let mut item = testing::normalized(&raw, &sc, &connection);
        assert!(TwitterVisibility.annotate(&mut item, &raw, &connection).await);
    }
}
