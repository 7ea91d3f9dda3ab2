//! Core types for syncing store customers with the Acquired payment API.
//!
//! This crate holds everything that decides *what* gets sent and *how* a reply
//! is read, without doing any I/O:
//!
//! - **Identifiers**: `LocalCustomerId`, `OrderId`, `ExternalCustomerId`
//! - **Addresses**: `RawAddress`, `NormalizedAddress`, `NormalizedContact`
//! - **Normalization**: `normalize_contact`, `normalize_address`
//! - **Comparison**: `addresses_equal`
//! - **Payloads**: `CustomerPayload` and its billing/shipping parts
//! - **Responses**: `Envelope` and the per-operation reply types
//! - **Links**: `CustomerLink` (unlinked vs. linked to an external id)
//! - **Collaborators**: `CustomerApi`, `CustomerDirectory`
//!
//! # Email is the only hard requirement
//!
//! Names, address lines and cities that fail validation are sent as empty
//! strings. A billing address without a valid email cannot become a
//! processor customer at all.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod address;
pub mod api;
pub mod compare;
pub mod customer;
pub mod email;
pub mod error;
pub mod ids;
pub mod link;
pub mod normalize;
pub mod payload;
pub mod response;

pub use address::{AddressFields, NormalizedAddress, NormalizedContact, RawAddress};
pub use api::{ApiError, CustomerApi, CustomerDirectory, DirectoryError};
pub use compare::{addresses_equal, CONTACT_FIELDS};
pub use customer::{LocalCustomer, Order};
pub use email::{Email, EmailError};
pub use error::{Result, SyncError};
pub use ids::{ExternalCustomerId, IdError, LocalCustomerId, OrderId};
pub use link::{CustomerLink, CUSTOMER_ID_META_KEY};
pub use normalize::{normalize_address, normalize_contact};
pub use payload::{BillingDetails, CustomerPayload, ShippingDetails};
pub use response::{
    ApiResponse, CustomerCreated, CustomerUpdated, Envelope, PaymentLinkCreated, RawResponse,
    ResponseError, ResponseKind, TransactionCancel, TransactionCapture, TransactionRefund,
};
