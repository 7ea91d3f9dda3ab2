//! Acquired API client.
//!
//! This crate talks to the Acquired payments API: customer creation and
//! update, hosted payment links, and transaction actions. Every reply is
//! returned through the validated envelope types of `acquired-core`.
//!
//! # Example
//!
//! ```no_run
//! use acquired_client::{AcquiredClient, ClientConfig};
//!
//! # async fn example() -> Result<(), acquired_client::ClientError> {
//! let client = AcquiredClient::from_config(&ClientConfig::from_env())?;
//!
//! let refund = client.refund_transaction("2c5a1b0e-9f2d", None).await?;
//! if refund.is_refunded() {
//!     println!("refunded");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;
mod types;

pub use client::{AcquiredClient, ClientOptions};
pub use config::{ClientConfig, Environment};
pub use error::ClientError;
pub use types::{LinkTransaction, PaymentLinkRequest};
