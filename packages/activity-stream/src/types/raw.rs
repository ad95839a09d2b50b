use facebook::{Photo, StatusUpdate};
use serde::{Deserialize, Serialize};
use twitter::Tweet;

use super::Provider;

/// A provider payload as fetched, before normalization.
///
/// Variants carry the client crates' typed payloads; the whole value is
/// serialized into `raw_data` on the normalized item so the original
/// shape survives for audit and reprocessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RawPost {
    Tweet(Tweet),
    FacebookStatus(StatusUpdate),
    FacebookPhoto(Photo),
}

impl RawPost {
    pub fn provider(&self) -> Provider {
        match self {
            RawPost::Tweet(_) => Provider::Twitter,
            RawPost::FacebookStatus(_) | RawPost::FacebookPhoto(_) => Provider::Facebook,
        }
    }

    /// Provider-native identifier of the underlying post.
    pub fn source_id(&self) -> &str {
        match self {
            RawPost::Tweet(t) => &t.id_str,
            RawPost::FacebookStatus(s) => &s.id,
            RawPost::FacebookPhoto(p) => &p.id,
        }
    }
}
