//! Pure Twitter REST API client.
//!
//! A minimal client for the Twitter v1.1 API. Supports fetching an
//! account's recent timeline with reply/retweet filtering.
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter::{TimelineOptions, TwitterClient};
//!
//! let client = TwitterClient::new("your-access-token".into());
//!
//! let tweets = client
//!     .user_timeline("natgeo", &TimelineOptions::default())
//!     .await?;
//! for tweet in &tweets {
//!     println!("{}", tweet.text);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, TwitterError};
pub use types::{Entities, MediaEntity, Tweet, TweetUser, UrlEntity};

const BASE_URL: &str = "https://api.twitter.com/1.1";

/// Options for timeline fetches.
#[derive(Debug, Clone)]
pub struct TimelineOptions {
    /// Maximum number of tweets to return.
    pub count: u32,
    pub exclude_replies: bool,
    pub include_rts: bool,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            count: 30,
            exclude_replies: true,
            include_rts: false,
        }
    }
}

pub struct TwitterClient {
    client: reqwest::Client,
    token: String,
}

impl TwitterClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Fetch an account's recent tweets, newest first.
    pub async fn user_timeline(
        &self,
        screen_name: &str,
        opts: &TimelineOptions,
    ) -> Result<Vec<Tweet>> {
        let url = format!("{}/statuses/user_timeline.json", BASE_URL);
        let count = opts.count.to_string();
        let exclude_replies = opts.exclude_replies.to_string();
        let include_rts = opts.include_rts.to_string();
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[
                ("screen_name", screen_name),
                ("count", count.as_str()),
                ("exclude_replies", exclude_replies.as_str()),
                ("include_rts", include_rts.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TwitterError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let tweets: Vec<Tweet> = resp.json().await?;
        tracing::debug!(screen_name, count = tweets.len(), "Fetched user timeline");
        Ok(tweets)
    }
}
