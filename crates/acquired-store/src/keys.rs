//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in column families.

use acquired_core::LocalCustomerId;

const SEPARATOR: u8 = 0;

/// Create a metadata entry key.
///
/// Format: `customer_id (8 bytes, big endian) || meta_key`
#[must_use]
pub fn meta_key(customer: LocalCustomerId, key: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + key.len());
    out.extend_from_slice(&customer.to_be_bytes());
    out.extend_from_slice(key.as_bytes());
    out
}

/// Create a prefix for iterating all customers with `key == value`.
///
/// Format: `meta_key || 0x00 || value || 0x00`
#[must_use]
pub fn index_prefix(key: &str, value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(key.len() + value.len() + 2);
    out.extend_from_slice(key.as_bytes());
    out.push(SEPARATOR);
    out.extend_from_slice(value.as_bytes());
    out.push(SEPARATOR);
    out
}

/// Create a reverse index key.
///
/// Big endian ids keep entries under one prefix sorted by customer id.
#[must_use]
pub fn index_key(key: &str, value: &str, customer: LocalCustomerId) -> Vec<u8> {
    let mut out = index_prefix(key, value);
    out.extend_from_slice(&customer.to_be_bytes());
    out
}

/// Extract the customer id from the tail of a reverse index key.
///
/// Returns `None` if the key is too short or the id is zero.
#[must_use]
pub fn customer_from_index_key(key: &[u8]) -> Option<LocalCustomerId> {
    let start = key.len().checked_sub(8)?;
    let bytes: [u8; 8] = key[start..].try_into().ok()?;
    LocalCustomerId::new(u64::from_be_bytes(bytes)).ok()
}
