//! Error types for customer sync.
//!
//! Every variant is recoverable: the reconciler logs it and falls back to a
//! guest-style checkout instead of surfacing it to the shopper.

use crate::response::ResponseError;
use crate::LocalCustomerId;

/// Result type for customer sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while reconciling a customer with the processor.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The billing address has no usable field at all.
    #[error("billing address is empty")]
    EmptyBillingAddress,

    /// The billing email is missing or not a valid address.
    #[error("customer data is not valid: missing or invalid email")]
    InvalidContactEmail,

    /// An update was requested for a customer that was never created remotely.
    #[error("customer {customer_id} has no external customer id")]
    MissingExternalLink {
        /// The local customer.
        customer_id: LocalCustomerId,
    },

    /// The processor answered, but not with success.
    #[error("{operation} request failed with status {status_code}: {response}")]
    RemoteRequestFailed {
        /// The API operation, e.g. `create_customer`.
        operation: &'static str,
        /// HTTP status code of the reply.
        status_code: u16,
        /// The reply as logged, see [`crate::Envelope::log_data`].
        response: String,
    },

    /// The reply did not have the structure its kind requires.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] ResponseError),

    /// The request never produced a reply.
    #[error("transport error: {0}")]
    Transport(String),

    /// Reading or writing the customer link failed.
    #[error("storage error: {0}")]
    Store(String),

    /// The host store could not provide the customer record.
    #[error("customer lookup failed: {0}")]
    Directory(String),

    /// No local customer carries this external id.
    #[error("no customer linked to external id {external_id}")]
    CustomerNotFound {
        /// The processor's customer id.
        external_id: String,
    },

    /// More than one local customer carries this external id.
    #[error("external id {external_id} is linked to {count} customers")]
    DuplicateLink {
        /// The processor's customer id.
        external_id: String,
        /// Number of local customers found.
        count: usize,
    },

    /// The external id already belongs to another local customer.
    #[error("external id {external_id} already belongs to customer {linked_to}")]
    LinkConflict {
        /// The processor's customer id.
        external_id: String,
        /// The customer that owns it.
        linked_to: LocalCustomerId,
    },
}
