//! Persistence of customer links on top of a [`MetaStore`].

use acquired_core::{
    CustomerLink, ExternalCustomerId, LocalCustomerId, Result, SyncError, CUSTOMER_ID_META_KEY,
};
use acquired_store::MetaStore;

/// Reads and writes the `local -> external` customer association.
///
/// One external id belongs to at most one local customer; the reverse
/// lookup treats anything else as an error rather than guessing.
#[derive(Debug, Clone)]
pub struct LinkRegistry<S> {
    store: S,
}

impl<S: MetaStore> LinkRegistry<S> {
    /// Wrap a metadata store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Current link of a local customer.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Store` if the store fails.
    pub fn link(&self, customer: LocalCustomerId) -> Result<CustomerLink> {
        let entry = self.store.get_meta(customer, CUSTOMER_ID_META_KEY)?;
        Ok(CustomerLink::from_meta(
            entry.as_ref().map(|entry| entry.value.as_str()),
        ))
    }

    /// Persist a link, replacing any previous one for this customer.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::LinkConflict` if the external id already belongs
    /// to another local customer, or `SyncError::Store` if the store fails.
    pub fn save_link(&self, customer: LocalCustomerId, external_id: &ExternalCustomerId) -> Result<()> {
        let owners = self
            .store
            .find_by_meta(CUSTOMER_ID_META_KEY, external_id.as_str())?;

        if let Some(other) = owners.into_iter().find(|owner| *owner != customer) {
            return Err(SyncError::LinkConflict {
                external_id: external_id.to_string(),
                linked_to: other,
            });
        }

        self.store
            .set_meta(customer, CUSTOMER_ID_META_KEY, external_id.as_str())?;
        Ok(())
    }

    /// Resolve an external id to the one local customer linked to it.
    ///
    /// # Errors
    ///
    /// - `SyncError::CustomerNotFound` if no customer carries the id.
    /// - `SyncError::DuplicateLink` if several do.
    pub fn find_customer(&self, external_id: &ExternalCustomerId) -> Result<LocalCustomerId> {
        let owners = self
            .store
            .find_by_meta(CUSTOMER_ID_META_KEY, external_id.as_str())?;

        match owners.as_slice() {
            [] => Err(SyncError::CustomerNotFound {
                external_id: external_id.to_string(),
            }),
            [customer] => Ok(*customer),
            _ => Err(SyncError::DuplicateLink {
                external_id: external_id.to_string(),
                count: owners.len(),
            }),
        }
    }
}
