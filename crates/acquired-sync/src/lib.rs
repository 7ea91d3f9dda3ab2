//! Customer sync between a store and the Acquired payments API.
//!
//! [`CustomerReconciler`] turns store customers and orders into processor
//! customers: it normalizes addresses, creates the customer on first use,
//! updates it afterwards, and remembers the link in a [`MetaStore`]. When
//! anything fails the checkout still goes ahead with the customer sent
//! inline, as for a guest.
//!
//! # Example
//!
//! ```no_run
//! use acquired_client::{AcquiredClient, ClientConfig};
//! use acquired_core::{CustomerDirectory, Order};
//! use acquired_store::MemoryStore;
//! use acquired_sync::CustomerReconciler;
//!
//! # async fn example(directory: impl CustomerDirectory, order: Order)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let client = AcquiredClient::from_config(&ClientConfig::from_env())?;
//! let reconciler = CustomerReconciler::new(client, directory, MemoryStore::new());
//!
//! let customer = reconciler.customer_data_for_checkout(&order).await;
//! println!("{}", customer.to_json()?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checkout;
pub mod links;
pub mod reconciler;

pub use checkout::CheckoutCustomer;
pub use links::LinkRegistry;
pub use reconciler::CustomerReconciler;

pub use acquired_store::MetaStore;

/// A reconciler talking to the real Acquired API.
pub type AcquiredReconciler<D, S> = CustomerReconciler<acquired_client::AcquiredClient, D, S>;
