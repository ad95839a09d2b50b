//! Typed errors for the Twitter client.

use thiserror::Error;

/// Errors returned by [`TwitterClient`](crate::TwitterClient) calls.
#[derive(Debug, Error)]
pub enum TwitterError {
    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Twitter API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Result type alias for Twitter client operations.
pub type Result<T> = std::result::Result<T, TwitterError>;
