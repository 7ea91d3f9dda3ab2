//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `MetaStore` trait.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use acquired_core::LocalCustomerId;

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{check_key, MetaEntry, MetaStore};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!("Opened customer metadata database");

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl MetaStore for RocksStore {
    fn get_meta(&self, customer: LocalCustomerId, key: &str) -> Result<Option<MetaEntry>> {
        let cf = self.cf(cf::CUSTOMER_META)?;

        self.db
            .get_cf(&cf, keys::meta_key(customer, key))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn set_meta(&self, customer: LocalCustomerId, key: &str, value: &str) -> Result<()> {
        check_key(key, Some(value))?;
        let cf_meta = self.cf(cf::CUSTOMER_META)?;
        let cf_index = self.cf(cf::CUSTOMER_META_INDEX)?;

        let entry = MetaEntry::new(value);
        let mut batch = WriteBatch::default();

        if let Some(old) = self.get_meta(customer, key)? {
            if old.value != value {
                batch.delete_cf(&cf_index, keys::index_key(key, &old.value, customer));
            }
        }
        batch.put_cf(&cf_meta, keys::meta_key(customer, key), Self::serialize(&entry)?);
        batch.put_cf(&cf_index, keys::index_key(key, value, customer), []); // Index entry (empty value)

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn delete_meta(&self, customer: LocalCustomerId, key: &str) -> Result<()> {
        let cf_meta = self.cf(cf::CUSTOMER_META)?;
        let cf_index = self.cf(cf::CUSTOMER_META_INDEX)?;

        let old = self.get_meta(customer, key)?.ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_meta, keys::meta_key(customer, key));
        batch.delete_cf(&cf_index, keys::index_key(key, &old.value, customer));

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn find_by_meta(&self, key: &str, value: &str) -> Result<Vec<LocalCustomerId>> {
        let cf_index = self.cf(cf::CUSTOMER_META_INDEX)?;
        let prefix = keys::index_prefix(key, value);

        let iter = self
            .db
            .iterator_cf(&cf_index, IteratorMode::From(&prefix, Direction::Forward));

        let mut customers = Vec::new();
        for item in iter {
            let (index_key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !index_key.starts_with(&prefix) {
                break;
            }

            // Only exact `prefix || id` keys belong to this value.
            if index_key.len() != prefix.len() + 8 {
                continue;
            }

            let customer = keys::customer_from_index_key(&index_key).ok_or_else(|| {
                StoreError::Serialization("corrupt customer meta index key".to_string())
            })?;
            customers.push(customer);
        }

        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const KEY: &str = "_acfw_customer_id";

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn id(n: u64) -> LocalCustomerId {
        LocalCustomerId::new(n).unwrap()
    }

    #[test]
    fn meta_crud() {
        let (store, _dir) = create_test_store();

        // Create
        store.set_meta(id(1), KEY, "cus-1").unwrap();

        // Read
        let entry = store.get_meta(id(1), KEY).unwrap().unwrap();
        assert_eq!(entry.value, "cus-1");

        // Update
        store.set_meta(id(1), KEY, "cus-2").unwrap();
        assert_eq!(store.get_meta(id(1), KEY).unwrap().unwrap().value, "cus-2");

        // Delete
        store.delete_meta(id(1), KEY).unwrap();
        assert!(store.get_meta(id(1), KEY).unwrap().is_none());
        assert!(matches!(
            store.delete_meta(id(1), KEY),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn reverse_lookup() {
        let (store, _dir) = create_test_store();
        store.set_meta(id(300), KEY, "cus-1").unwrap();
        store.set_meta(id(2), KEY, "cus-1").unwrap();
        store.set_meta(id(4), KEY, "cus-10").unwrap();

        assert_eq!(store.find_by_meta(KEY, "cus-1").unwrap(), vec![id(2), id(300)]);
        assert_eq!(store.find_by_meta(KEY, "cus-10").unwrap(), vec![id(4)]);
        assert!(store.find_by_meta(KEY, "cus-2").unwrap().is_empty());
    }

    #[test]
    fn update_moves_index_entry() {
        let (store, _dir) = create_test_store();
        store.set_meta(id(1), KEY, "cus-1").unwrap();
        store.set_meta(id(1), KEY, "cus-2").unwrap();

        assert!(store.find_by_meta(KEY, "cus-1").unwrap().is_empty());
        assert_eq!(store.find_by_meta(KEY, "cus-2").unwrap(), vec![id(1)]);

        store.delete_meta(id(1), KEY).unwrap();
        assert!(store.find_by_meta(KEY, "cus-2").unwrap().is_empty());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = RocksStore::open(dir.path()).unwrap();
            store.set_meta(id(8), KEY, "cus-8").unwrap();
        }

        let store = RocksStore::open(dir.path()).unwrap();
        assert_eq!(store.get_meta(id(8), KEY).unwrap().unwrap().value, "cus-8");
        assert_eq!(store.find_by_meta(KEY, "cus-8").unwrap(), vec![id(8)]);
    }
}
