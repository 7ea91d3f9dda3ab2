//! In-memory storage implementation.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use acquired_core::LocalCustomerId;

use crate::error::{Result, StoreError};
use crate::{check_key, MetaEntry, MetaStore};

#[derive(Default)]
struct Inner {
    entries: HashMap<(LocalCustomerId, String), MetaEntry>,
    index: HashMap<(String, String), BTreeSet<LocalCustomerId>>,
}

impl Inner {
    fn unindex(&mut self, customer: LocalCustomerId, key: &str, value: &str) {
        let index_key = (key.to_string(), value.to_string());
        if let Some(customers) = self.index.get_mut(&index_key) {
            customers.remove(&customer);
            if customers.is_empty() {
                self.index.remove(&index_key);
            }
        }
    }
}

/// Process-local metadata store.
///
/// Clones share the same data.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))
    }
}

impl MetaStore for MemoryStore {
    fn get_meta(&self, customer: LocalCustomerId, key: &str) -> Result<Option<MetaEntry>> {
        let inner = self.read()?;
        Ok(inner.entries.get(&(customer, key.to_string())).cloned())
    }

    fn set_meta(&self, customer: LocalCustomerId, key: &str, value: &str) -> Result<()> {
        check_key(key, Some(value))?;
        let mut inner = self.write()?;

        if let Some(old) = inner
            .entries
            .insert((customer, key.to_string()), MetaEntry::new(value))
        {
            inner.unindex(customer, key, &old.value);
        }
        inner
            .index
            .entry((key.to_string(), value.to_string()))
            .or_default()
            .insert(customer);

        Ok(())
    }

    fn delete_meta(&self, customer: LocalCustomerId, key: &str) -> Result<()> {
        let mut inner = self.write()?;
        let old = inner
            .entries
            .remove(&(customer, key.to_string()))
            .ok_or(StoreError::NotFound)?;
        inner.unindex(customer, key, &old.value);
        Ok(())
    }

    fn find_by_meta(&self, key: &str, value: &str) -> Result<Vec<LocalCustomerId>> {
        let inner = self.read()?;
        Ok(inner
            .index
            .get(&(key.to_string(), value.to_string()))
            .map(|customers| customers.iter().copied().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "_acfw_customer_id";

    fn id(n: u64) -> LocalCustomerId {
        LocalCustomerId::new(n).unwrap()
    }

    #[test]
    fn meta_crud() {
        let store = MemoryStore::new();

        assert!(store.get_meta(id(1), KEY).unwrap().is_none());

        store.set_meta(id(1), KEY, "cus-1").unwrap();
        assert_eq!(store.get_meta(id(1), KEY).unwrap().unwrap().value, "cus-1");

        store.set_meta(id(1), KEY, "cus-2").unwrap();
        assert_eq!(store.get_meta(id(1), KEY).unwrap().unwrap().value, "cus-2");

        store.delete_meta(id(1), KEY).unwrap();
        assert!(store.get_meta(id(1), KEY).unwrap().is_none());
        assert!(matches!(
            store.delete_meta(id(1), KEY),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn reverse_lookup_follows_updates() {
        let store = MemoryStore::new();
        store.set_meta(id(1), KEY, "cus-1").unwrap();
        assert_eq!(store.find_by_meta(KEY, "cus-1").unwrap(), vec![id(1)]);

        store.set_meta(id(1), KEY, "cus-2").unwrap();
        assert!(store.find_by_meta(KEY, "cus-1").unwrap().is_empty());
        assert_eq!(store.find_by_meta(KEY, "cus-2").unwrap(), vec![id(1)]);

        store.delete_meta(id(1), KEY).unwrap();
        assert!(store.find_by_meta(KEY, "cus-2").unwrap().is_empty());
    }

    #[test]
    fn reverse_lookup_lists_every_match_in_order() {
        let store = MemoryStore::new();
        store.set_meta(id(9), KEY, "cus-1").unwrap();
        store.set_meta(id(3), KEY, "cus-1").unwrap();
        store.set_meta(id(5), KEY, "cus-5").unwrap();

        assert_eq!(store.find_by_meta(KEY, "cus-1").unwrap(), vec![id(3), id(9)]);
    }

    #[test]
    fn keys_are_independent() {
        let store = MemoryStore::new();
        store.set_meta(id(1), KEY, "x").unwrap();
        store.set_meta(id(1), "other", "x").unwrap();

        store.delete_meta(id(1), "other").unwrap();
        assert_eq!(store.find_by_meta(KEY, "x").unwrap(), vec![id(1)]);
    }

    #[test]
    fn clones_share_data() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.set_meta(id(1), KEY, "cus-1").unwrap();
        assert!(clone.get_meta(id(1), KEY).unwrap().is_some());
    }

    #[test]
    fn rejects_unencodable_keys() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.set_meta(id(1), "", "v"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set_meta(id(1), KEY, "a\0b"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
