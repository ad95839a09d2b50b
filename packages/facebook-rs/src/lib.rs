//! Pure Facebook Graph API client.
//!
//! A minimal client for the Graph API. Supports reading an account's
//! status updates and uploaded photos, and the privacy setting of a
//! single post.
//!
//! # Example
//!
//! ```rust,ignore
//! use facebook::FacebookClient;
//!
//! let client = FacebookClient::new("page-access-token".into());
//!
//! let photos = client.photos("1234567890", 30).await?;
//! for photo in &photos {
//!     println!("{}", photo.name.as_deref().unwrap_or("(no caption)"));
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{FacebookError, Result};
pub use types::{
    Author, DataPage, ImageVariant, Location, Photo, Place, PostPrivacy, PrivacySetting,
    StatusUpdate,
};

use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://graph.facebook.com/v2.12";

pub struct FacebookClient {
    client: reqwest::Client,
    access_token: String,
}

impl FacebookClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", BASE_URL, path);
        let resp = self
            .client
            .get(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FacebookError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch an account's recent status updates.
    pub async fn statuses(&self, account_id: &str, limit: u32) -> Result<Vec<StatusUpdate>> {
        let limit = limit.to_string();
        let page: DataPage<StatusUpdate> = self
            .get(
                &format!("{}/statuses", account_id),
                &[
                    ("limit", limit.as_str()),
                    ("fields", "id,message,updated_time,from,place,privacy"),
                ],
            )
            .await?;
        tracing::debug!(account_id, count = page.data.len(), "Fetched statuses");
        Ok(page.data)
    }

    /// Fetch an account's recently uploaded photos.
    pub async fn photos(&self, account_id: &str, limit: u32) -> Result<Vec<Photo>> {
        let limit = limit.to_string();
        let page: DataPage<Photo> = self
            .get(
                &format!("{}/photos", account_id),
                &[
                    ("type", "uploaded"),
                    ("limit", limit.as_str()),
                    ("fields", "id,name,created_time,images,from,place,link"),
                ],
            )
            .await?;
        tracing::debug!(account_id, count = page.data.len(), "Fetched photos");
        Ok(page.data)
    }

    /// Read the privacy setting of a single post. Returns `None` when the
    /// Graph API has no privacy object for the post.
    pub async fn post_privacy(&self, post_id: &str) -> Result<Option<PrivacySetting>> {
        let post: PostPrivacy = self
            .get(post_id, &[("fields", "id,privacy")])
            .await?;
        Ok(post.privacy)
    }
}
