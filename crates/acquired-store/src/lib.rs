//! Customer metadata storage for the Acquired customer sync.
//!
//! The host store keeps arbitrary string metadata on each customer. The sync
//! uses one key, [`acquired_core::CUSTOMER_ID_META_KEY`], to remember which
//! processor customer a local customer is linked to, and looks it up in
//! reverse when a payment reply names only the processor id.
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local, always available.
//! - `RocksStore`: persistent, behind the `rocksdb-backend` feature. Uses the
//!   following column families:
//!   - `customer_meta`: entries keyed by `customer_id || meta_key`
//!   - `customer_meta_index`: reverse index keyed by
//!     `meta_key || 0x00 || value || 0x00 || customer_id`
//!
//! # Example
//!
//! ```
//! use acquired_core::{LocalCustomerId, CUSTOMER_ID_META_KEY};
//! use acquired_store::{MemoryStore, MetaStore};
//!
//! let store = MemoryStore::new();
//! let customer = LocalCustomerId::new(7).unwrap();
//!
//! store.set_meta(customer, CUSTOMER_ID_META_KEY, "cus-1").unwrap();
//! assert_eq!(
//!     store.find_by_meta(CUSTOMER_ID_META_KEY, "cus-1").unwrap(),
//!     vec![customer]
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use acquired_core::LocalCustomerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    /// The value as written.
    pub value: String,
    /// When the value was last written.
    pub updated_at: DateTime<Utc>,
}

impl MetaEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Per-customer metadata storage.
///
/// Implementations must keep the reverse lookup in step with the forward
/// entries: after `set_meta(c, k, v)`, `find_by_meta(k, v)` contains `c`,
/// and after the value changes or is deleted, it no longer does.
pub trait MetaStore: Send + Sync {
    /// Read a metadata value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_meta(&self, customer: LocalCustomerId, key: &str) -> Result<Option<MetaEntry>>;

    /// Insert or replace a metadata value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` if the key is empty or either part
    /// contains a NUL byte, or an error if the database operation fails.
    fn set_meta(&self, customer: LocalCustomerId, key: &str, value: &str) -> Result<()>;

    /// Remove a metadata value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no value is stored.
    fn delete_meta(&self, customer: LocalCustomerId, key: &str) -> Result<()>;

    /// All customers whose `key` currently equals `value`, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_by_meta(&self, key: &str, value: &str) -> Result<Vec<LocalCustomerId>>;
}

/// Reject keys and values the index encoding cannot represent.
pub(crate) fn check_key(key: &str, value: Option<&str>) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("empty meta key".to_string()));
    }
    if key.contains('\0') || value.is_some_and(|v| v.contains('\0')) {
        return Err(StoreError::InvalidKey(format!(
            "NUL byte in meta entry for {key:?}"
        )));
    }
    Ok(())
}
