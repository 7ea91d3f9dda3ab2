//! Host-store records the reconciler reads.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{CustomerPayload, LocalCustomerId, OrderId, RawAddress};

/// A registered customer as the host store knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCustomer {
    /// Host store id.
    pub id: LocalCustomerId,
    /// Account-level email, used when billing has none.
    #[serde(default)]
    pub email: Option<String>,
    /// Saved billing address.
    #[serde(default)]
    pub billing: RawAddress,
    /// Saved shipping address, if the customer set one.
    #[serde(default)]
    pub shipping: Option<RawAddress>,
}

impl LocalCustomer {
    /// Build the processor payload from the saved addresses.
    ///
    /// A blank billing email falls back to the account email. Emails are
    /// always copied into billing and shipping since the customer has an
    /// account.
    ///
    /// # Errors
    ///
    /// See [`CustomerPayload::build`].
    pub fn payload(&self) -> Result<CustomerPayload> {
        let mut billing = self.billing.clone();
        billing.backfill_email(self.email.as_deref());
        CustomerPayload::build(&billing, self.shipping.as_ref(), true)
    }
}

/// An order at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Host store id.
    pub id: OrderId,
    /// The customer who placed it; `None` for guest checkout.
    #[serde(default)]
    pub customer_id: Option<LocalCustomerId>,
    /// Billing address entered at checkout.
    #[serde(default)]
    pub billing: RawAddress,
    /// Shipping address, if the order ships somewhere.
    #[serde(default)]
    pub shipping: Option<RawAddress>,
}

impl Order {
    /// Returns `true` if no customer account is attached.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.customer_id.is_none()
    }

    /// Build the processor payload from the order addresses.
    ///
    /// `include_email` defaults to whether the order has a customer.
    ///
    /// # Errors
    ///
    /// See [`CustomerPayload::build`].
    pub fn payload(&self, include_email: Option<bool>) -> Result<CustomerPayload> {
        CustomerPayload::build(
            &self.billing,
            self.shipping.as_ref(),
            include_email.unwrap_or(!self.is_guest()),
        )
    }
}
