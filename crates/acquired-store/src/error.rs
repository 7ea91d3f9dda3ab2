//! Error types for customer metadata storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// A key or value cannot be stored as given.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl From<StoreError> for acquired_core::SyncError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}
