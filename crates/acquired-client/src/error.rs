//! Client error types.

use acquired_core::{ApiError, ResponseError};

/// Errors that can occur when using the Acquired client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The login endpoint refused the credentials.
    #[error("authentication failed with status {status}")]
    Authentication {
        /// HTTP status code.
        status: u16,
    },

    /// The reply failed envelope validation.
    #[error("malformed response: {0}")]
    Malformed(#[from] ResponseError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An id cannot be placed in a request path.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Malformed(e) => Self::Malformed(e),
            other => Self::Transport(other.to_string()),
        }
    }
}
