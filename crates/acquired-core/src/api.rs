//! Collaborator traits.
//!
//! The reconciler never talks HTTP or reads the host database directly; it
//! goes through these traits. `acquired-client` implements [`CustomerApi`]
//! over HTTP, and the host integration implements [`CustomerDirectory`].

use async_trait::async_trait;

use crate::response::ResponseError;
use crate::{
    CustomerCreated, CustomerPayload, CustomerUpdated, ExternalCustomerId, LocalCustomer,
    LocalCustomerId, SyncError,
};

/// Failure to obtain a validated reply from the processor.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was not answered (connection, timeout, authentication).
    #[error("transport error: {0}")]
    Transport(String),

    /// The reply failed envelope validation.
    #[error("malformed response: {0}")]
    Malformed(#[from] ResponseError),
}

impl From<ApiError> for SyncError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(message) => Self::Transport(message),
            ApiError::Malformed(e) => Self::MalformedResponse(e),
        }
    }
}

/// Customer endpoints of the processor.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if no reply arrives or the reply is malformed. A
    /// well-formed rejection is an `Ok` whose `is_created()` is `false`.
    async fn create_customer(&self, payload: &CustomerPayload) -> Result<CustomerCreated, ApiError>;

    /// Replace the details of an existing customer.
    ///
    /// # Errors
    ///
    /// Returns an error if no reply arrives or the reply is malformed.
    async fn update_customer(
        &self,
        customer_id: &ExternalCustomerId,
        payload: &CustomerPayload,
    ) -> Result<CustomerUpdated, ApiError>;
}

/// Failure to load a customer from the host store.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// No customer with this id.
    #[error("customer not found: {0}")]
    NotFound(LocalCustomerId),

    /// The host store failed.
    #[error("customer directory error: {0}")]
    Backend(String),
}

impl From<DirectoryError> for SyncError {
    fn from(err: DirectoryError) -> Self {
        Self::Directory(err.to_string())
    }
}

/// Read access to registered customers in the host store.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Load a customer with its saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the id is unknown.
    async fn get_customer(&self, id: LocalCustomerId) -> Result<LocalCustomer, DirectoryError>;
}
