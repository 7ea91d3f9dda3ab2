//! Create-or-update orchestration of processor customers.
//!
//! The `Result`-returning methods run the pipeline and propagate every
//! [`SyncError`]. The entry points (`customer_data_for_checkout`,
//! `update_customer_in_my_account`, `customer_data_for_new_payment_method`)
//! are the only place errors are turned into a log event and a fallback.

use acquired_core::{
    CustomerApi, CustomerDirectory, CustomerLink, CustomerPayload, ExternalCustomerId,
    LocalCustomer, LocalCustomerId, Order, ResponseKind, Result, SyncError,
};
use acquired_store::MetaStore;

use crate::checkout::CheckoutCustomer;
use crate::links::LinkRegistry;

/// Keeps local customers and processor customers in step.
#[derive(Debug)]
pub struct CustomerReconciler<A, D, S> {
    api: A,
    directory: D,
    links: LinkRegistry<S>,
}

impl<A, D, S> CustomerReconciler<A, D, S>
where
    A: CustomerApi,
    D: CustomerDirectory,
    S: MetaStore,
{
    /// Create a reconciler over its collaborators.
    pub const fn new(api: A, directory: D, store: S) -> Self {
        Self {
            api,
            directory,
            links: LinkRegistry::new(store),
        }
    }

    /// The link registry.
    pub const fn links(&self) -> &LinkRegistry<S> {
        &self.links
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Customer fragment for an order's payment link.
    ///
    /// Orders with an account reference the synced processor customer. When
    /// sync fails, or for guest orders, the customer is sent inline as a
    /// guest, without billing and shipping emails.
    pub async fn customer_data_for_checkout(&self, order: &Order) -> CheckoutCustomer {
        if let Some(customer_id) = order.customer_id {
            match self.sync_order_customer(order, customer_id).await {
                Ok(external_id) => {
                    tracing::debug!(
                        order_id = %order.id,
                        user_id = %customer_id,
                        customer_id = %external_id,
                        "Using stored Acquired customer for checkout"
                    );
                    return CheckoutCustomer::Stored {
                        customer_id: external_id,
                    };
                }
                Err(e) => {
                    tracing::error!(
                        operation = "customer_data_for_checkout",
                        order_id = %order.id,
                        user_id = %customer_id,
                        error = %e,
                        "Customer sync failed, continuing as guest"
                    );
                }
            }
        }

        match order.payload(Some(false)) {
            Ok(payload) => CheckoutCustomer::Inline(payload),
            Err(e) => {
                tracing::error!(
                    operation = "customer_data_for_checkout",
                    order_id = %order.id,
                    error = %e,
                    "Failed to build guest customer data"
                );
                CheckoutCustomer::Empty
            }
        }
    }

    /// Push account changes of an already linked customer.
    ///
    /// Customers never created remotely are left alone; they are created on
    /// their next checkout.
    pub async fn update_customer_in_my_account(
        &self,
        customer: &LocalCustomer,
    ) -> Option<ExternalCustomerId> {
        match self.update_linked_customer(customer).await {
            Ok(external_id) => {
                tracing::debug!(
                    user_id = %customer.id,
                    customer_id = %external_id,
                    "Updated Acquired customer from account details"
                );
                Some(external_id)
            }
            Err(e) => {
                tracing::error!(
                    operation = "update_customer_in_my_account",
                    user_id = %customer.id,
                    error = %e,
                    "Failed to update Acquired customer"
                );
                None
            }
        }
    }

    /// External id to attach a new saved payment method to, creating the
    /// processor customer if needed.
    pub async fn customer_data_for_new_payment_method(
        &self,
        customer_id: LocalCustomerId,
    ) -> Option<ExternalCustomerId> {
        match self.get_or_create_customer(customer_id).await {
            Ok(external_id) => Some(external_id),
            Err(e) => {
                tracing::error!(
                    operation = "customer_data_for_new_payment_method",
                    user_id = %customer_id,
                    error = %e,
                    "Failed to get Acquired customer for payment method"
                );
                None
            }
        }
    }

    /// Resolve a processor customer back to the local customer record.
    ///
    /// # Errors
    ///
    /// - `SyncError::CustomerNotFound` / `SyncError::DuplicateLink` unless
    ///   exactly one local customer carries the id.
    /// - `SyncError::Directory` if the record cannot be loaded.
    pub async fn customer_from_external_id(
        &self,
        external_id: &ExternalCustomerId,
    ) -> Result<LocalCustomer> {
        let customer_id = self.links.find_customer(external_id)?;
        Ok(self.directory.get_customer(customer_id).await?)
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Create or update the processor customer of a local customer, using
    /// its saved account details.
    ///
    /// # Errors
    ///
    /// Returns any error from normalization, the remote call or the store.
    pub async fn sync_local_customer(&self, customer: &LocalCustomer) -> Result<ExternalCustomerId> {
        let payload = customer.payload()?;
        self.sync_customer(customer.id, &payload).await
    }

    /// Update the linked processor customer, or create one and persist the
    /// link when there is none.
    ///
    /// # Errors
    ///
    /// Returns any error from the remote call or the store.
    pub async fn sync_customer(
        &self,
        customer_id: LocalCustomerId,
        payload: &CustomerPayload,
    ) -> Result<ExternalCustomerId> {
        match self.links.link(customer_id)? {
            CustomerLink::Linked(external_id) => {
                self.update_customer(&external_id, payload).await?;
                tracing::debug!(
                    user_id = %customer_id,
                    customer_id = %external_id,
                    "Confirmed Acquired customer link"
                );
                Ok(external_id)
            }
            CustomerLink::Unlinked => {
                let external_id = self.create_customer(payload).await?;
                self.links.save_link(customer_id, &external_id)?;
                tracing::debug!(
                    user_id = %customer_id,
                    customer_id = %external_id,
                    "Saved Acquired customer link"
                );
                Ok(external_id)
            }
        }
    }

    /// Create a processor customer.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteRequestFailed` if the processor rejects it.
    pub async fn create_customer(&self, payload: &CustomerPayload) -> Result<ExternalCustomerId> {
        let created = self.api.create_customer(payload).await?;

        if let Some(external_id) = created.customer_id() {
            return Ok(external_id.clone());
        }

        let envelope = created.envelope();
        Err(SyncError::RemoteRequestFailed {
            operation: ResponseKind::CustomerCreate.operation(),
            status_code: envelope.status_code(),
            response: envelope.log_data().to_string(),
        })
    }

    /// Replace the details of a processor customer.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::RemoteRequestFailed` if the processor rejects it.
    pub async fn update_customer(
        &self,
        external_id: &ExternalCustomerId,
        payload: &CustomerPayload,
    ) -> Result<()> {
        let updated = self.api.update_customer(external_id, payload).await?;

        if updated.request_is_success() {
            return Ok(());
        }

        let envelope = updated.envelope();
        Err(SyncError::RemoteRequestFailed {
            operation: ResponseKind::CustomerUpdate.operation(),
            status_code: envelope.status_code(),
            response: envelope.log_data().to_string(),
        })
    }

    async fn sync_order_customer(
        &self,
        order: &Order,
        customer_id: LocalCustomerId,
    ) -> Result<ExternalCustomerId> {
        let mut order = order.clone();
        if order.billing.email().is_none() {
            let customer = self.directory.get_customer(customer_id).await?;
            order.billing.backfill_email(customer.email.as_deref());
        }

        let payload = order.payload(Some(true))?;
        self.sync_customer(customer_id, &payload).await
    }

    async fn update_linked_customer(&self, customer: &LocalCustomer) -> Result<ExternalCustomerId> {
        let payload = customer.payload()?;

        let external_id = match self.links.link(customer.id)? {
            CustomerLink::Linked(external_id) => external_id,
            CustomerLink::Unlinked => {
                return Err(SyncError::MissingExternalLink {
                    customer_id: customer.id,
                })
            }
        };

        self.update_customer(&external_id, &payload).await?;
        Ok(external_id)
    }

    async fn get_or_create_customer(&self, customer_id: LocalCustomerId) -> Result<ExternalCustomerId> {
        if let CustomerLink::Linked(external_id) = self.links.link(customer_id)? {
            return Ok(external_id);
        }

        let customer = self.directory.get_customer(customer_id).await?;
        let payload = customer.payload()?;
        let external_id = self.create_customer(&payload).await?;
        self.links.save_link(customer_id, &external_id)?;

        tracing::debug!(
            user_id = %customer_id,
            customer_id = %external_id,
            "Created Acquired customer for payment method"
        );
        Ok(external_id)
    }
}
