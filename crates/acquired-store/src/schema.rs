//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Metadata entries, keyed by `customer_id || meta_key`.
    pub const CUSTOMER_META: &str = "customer_meta";

    /// Index: customers by metadata value, keyed by
    /// `meta_key || 0x00 || value || 0x00 || customer_id`.
    /// Value is empty (index only).
    pub const CUSTOMER_META_INDEX: &str = "customer_meta_index";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::CUSTOMER_META, cf::CUSTOMER_META_INDEX]
}
