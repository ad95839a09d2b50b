use serde::{Deserialize, Serialize};

/// Envelope for Graph API collection responses.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPage<T> {
    pub data: Vec<T>,
}

/// A status update from the `/statuses` edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Composite Graph id, "{page_id}_{post_id}".
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Statuses only carry an update timestamp, e.g. "2015-03-21T12:00:00+0000".
    pub updated_time: String,
    #[serde(default)]
    pub from: Option<Author>,
    #[serde(default)]
    pub place: Option<Place>,
    #[serde(default)]
    pub privacy: Option<PrivacySetting>,
}

/// An uploaded photo from the `/photos` edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    /// Caption, when the uploader wrote one.
    #[serde(default)]
    pub name: Option<String>,
    pub created_time: String,
    /// Rendered variants, largest first in practice but unordered per the API contract.
    #[serde(default)]
    pub images: Vec<ImageVariant>,
    #[serde(default)]
    pub from: Option<Author>,
    #[serde(default)]
    pub place: Option<Place>,
    /// Permalink to the photo page.
    #[serde(default)]
    pub link: Option<String>,
}

/// One rendered size of a photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageVariant {
    pub width: u32,
    pub height: u32,
    pub source: String,
}

/// The posting account, as embedded in feed objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
}

/// A tagged place, with whatever location detail the provider has.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// Street-level location detail; any subset of fields may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A post's privacy setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacySetting {
    /// Visibility level, e.g. "EVERYONE", "ALL_FRIENDS", "SELF".
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response shape for a single-post privacy read.
#[derive(Debug, Clone, Deserialize)]
pub struct PostPrivacy {
    pub id: String,
    #[serde(default)]
    pub privacy: Option<PrivacySetting>,
}
