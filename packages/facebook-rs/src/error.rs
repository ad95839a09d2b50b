//! Typed errors for the Graph API client.

use thiserror::Error;

/// Errors returned by [`FacebookClient`](crate::FacebookClient) calls.
#[derive(Debug, Error)]
pub enum FacebookError {
    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Graph API answered with a non-success status.
    #[error("Graph API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Result type alias for Graph API operations.
pub type Result<T> = std::result::Result<T, FacebookError>;
