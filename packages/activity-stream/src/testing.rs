//! Mock collaborators and payload fixtures for tests.
//!
//! Everything here is exercised by the crate's own unit and integration
//! tests; downstream crates can reuse the same fixtures against the
//! in-memory store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::PolicyError;
use crate::normalize::Normalizer;
use crate::traits::policy::PrivacyLookup;
use crate::types::{
    Connection, ItemKind, NewStreamItem, Provider, RawPost, StreamConnection,
};

/// Privacy lookup with canned levels per post id.
#[derive(Default)]
pub struct MockPrivacyLookup {
    levels: Mutex<HashMap<String, String>>,
    fail: bool,
}

impl MockPrivacyLookup {
    pub fn with_level(self, post_id: &str, level: &str) -> Self {
        self.levels
            .lock()
            .unwrap()
            .insert(post_id.to_string(), level.to_string());
        self
    }

    /// A lookup that always errors, for the neutral-on-failure path.
    pub fn failing() -> Self {
        Self {
            levels: Mutex::new(HashMap::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl PrivacyLookup for MockPrivacyLookup {
    async fn post_privacy(
        &self,
        _connection: &Connection,
        post_id: &str,
    ) -> Result<Option<String>, PolicyError> {
        if self.fail {
            return Err(PolicyError::Lookup("privacy endpoint down".into()));
        }
        Ok(self.levels.lock().unwrap().get(post_id).cloned())
    }
}

pub fn twitter_connection() -> Connection {
    Connection {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        provider: Provider::Twitter,
        external_account_id: "501".to_string(),
        username: "testuser".to_string(),
        token: "twitter-token".to_string(),
        is_active: true,
    }
}

pub fn facebook_connection() -> Connection {
    Connection {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        provider: Provider::Facebook,
        external_account_id: "10".to_string(),
        username: "testpage".to_string(),
        token: "facebook-token".to_string(),
        is_active: true,
    }
}

/// A stream connection pointing at the given connection, with the
/// default windows (refresh 1h, delay 0h).
pub fn stream_connection(connection: &Connection) -> StreamConnection {
    let now = Utc::now();
    StreamConnection {
        id: Uuid::new_v4(),
        stream_id: Uuid::new_v4(),
        connection_id: connection.id,
        stream_refresh_hours: 1,
        post_delay_hours: 0,
        is_published: true,
        is_active: true,
        created: now,
        updated: now,
    }
}

pub fn tweet(id: &str, text: &str) -> twitter::Tweet {
    twitter::Tweet {
        id_str: id.to_string(),
        text: text.to_string(),
        created_at: "Wed Aug 27 13:08:45 +0000 2008".to_string(),
        entities: twitter::Entities::default(),
        user: twitter::TweetUser {
            id_str: "501".to_string(),
            screen_name: "testuser".to_string(),
            protected: false,
        },
    }
}

pub fn url_entity(url: &str, expanded: &str) -> twitter::UrlEntity {
    twitter::UrlEntity {
        url: url.to_string(),
        expanded_url: expanded.to_string(),
    }
}

pub fn photo_entity(id: &str, url: &str, media_url: &str) -> twitter::MediaEntity {
    twitter::MediaEntity {
        id_str: id.to_string(),
        url: url.to_string(),
        media_url_https: media_url.to_string(),
        media_type: "photo".to_string(),
    }
}

pub fn fb_status(id: &str, message: Option<&str>) -> facebook::StatusUpdate {
    facebook::StatusUpdate {
        id: id.to_string(),
        message: message.map(Into::into),
        updated_time: "2016-05-01T12:00:00+0000".to_string(),
        from: Some(facebook::Author {
            id: "10".to_string(),
            name: "Test Page".to_string(),
        }),
        place: None,
        privacy: None,
    }
}

/// A photo with one image variant per requested width, each sourced at
/// `https://cdn.test/w{width}.jpg`.
pub fn fb_photo_with_widths(id: &str, widths: &[u32]) -> facebook::Photo {
    facebook::Photo {
        id: id.to_string(),
        name: Some("a caption".to_string()),
        created_time: "2016-05-01T09:30:00+0000".to_string(),
        images: widths
            .iter()
            .map(|w| facebook::ImageVariant {
                width: *w,
                height: w * 3 / 4,
                source: format!("https://cdn.test/w{}.jpg", w),
            })
            .collect(),
        from: Some(facebook::Author {
            id: "10".to_string(),
            name: "Test Page".to_string(),
        }),
        place: None,
        link: None,
    }
}

/// Normalize a raw post with the UTC normalizer; panics on malformed
/// fixtures.
pub fn normalized(
    raw: &RawPost,
    stream_connection: &StreamConnection,
    connection: &Connection,
) -> NewStreamItem {
    Normalizer::utc()
        .normalize(raw, stream_connection, connection)
        .expect("fixture payload should normalize")
}

/// A minimal insertable item for store-level tests.
pub fn new_item(stream_id: Uuid, connection_id: Uuid, source_id: &str) -> NewStreamItem {
    let mut item = NewStreamItem::new(
        stream_id,
        connection_id,
        Provider::Twitter,
        ItemKind::Status,
        Utc::now(),
        source_id.to_string(),
    );
    item.title = source_id.to_string();
    item.body = format!("body of {}", source_id);
    item.permalink = format!("https://twitter.com/testuser/status/{}", source_id);
    item
}
