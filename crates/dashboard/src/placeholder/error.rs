//! Remote user source errors.

use roster_core::UserId;
use thiserror::Error;

/// Errors that can occur when talking to the remote user source.
#[derive(Debug, Error)]
pub enum PlaceholderError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The remote source has no user with this identifier.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// Failed to decode the response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl PlaceholderError {
    /// Whether the failure means "no such user" rather than "could not ask".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
