use serde::{Deserialize, Serialize};

/// A single tweet from the user timeline endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id_str: String,
    pub text: String,
    /// Provider-native creation timestamp, e.g. "Wed Aug 27 13:08:45 +0000 2008".
    pub created_at: String,
    #[serde(default)]
    pub entities: Entities,
    pub user: TweetUser,
}

/// Entity lists attached to a tweet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub media: Vec<MediaEntity>,
}

/// A shortened URL and its expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlEntity {
    /// The t.co form as it appears in the tweet text.
    pub url: String,
    pub expanded_url: String,
}

/// An embedded media entity (photo, video, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaEntity {
    pub id_str: String,
    /// The t.co form as it appears in the tweet text.
    pub url: String,
    pub media_url_https: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

/// The authoring account, as embedded in each timeline entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetUser {
    pub id_str: String,
    pub screen_name: String,
    #[serde(default)]
    pub protected: bool,
}
