//! The customer object sent to the processor.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::{addresses_equal, normalize_address, normalize_contact};
use crate::{Email, NormalizedAddress, NormalizedContact, RawAddress};

/// Billing part of a [`CustomerPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    /// Normalized billing address.
    pub address: NormalizedAddress,
    /// Contact email, only for shoppers with an account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// Shipping part of a [`CustomerPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    /// `true` when shipping goes to the billing address.
    pub address_match: bool,
    /// Present only when `address_match` is `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<NormalizedAddress>,
    /// Contact email, only for shoppers with an account and a separate
    /// shipping address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// A customer in the processor's schema.
///
/// Serializes to the object the customer endpoints accept, which is also
/// the inline `customer` member of a guest payment link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPayload {
    /// Name and email.
    #[serde(flatten)]
    pub contact: NormalizedContact,
    /// Billing details.
    pub billing: BillingDetails,
    /// Shipping details.
    pub shipping: ShippingDetails,
}

impl CustomerPayload {
    /// Build a payload from raw billing and optional shipping addresses.
    ///
    /// `include_email` copies the contact email into the billing and shipping
    /// objects; it is meant for shoppers tied to an account.
    ///
    /// # Errors
    ///
    /// - `SyncError::EmptyBillingAddress` if billing carries no data.
    /// - `SyncError::InvalidContactEmail` if billing has no valid email.
    pub fn build(
        billing: &RawAddress,
        shipping: Option<&RawAddress>,
        include_email: bool,
    ) -> Result<Self> {
        if billing.is_empty() {
            return Err(SyncError::EmptyBillingAddress);
        }

        let contact = normalize_contact(billing).ok_or(SyncError::InvalidContactEmail)?;
        let email = include_email.then(|| contact.email.clone());

        let billing_address = normalize_address(billing);

        let shipping_address = shipping
            .map(normalize_address)
            .filter(|address| !addresses_equal(&billing_address, address));

        let shipping = match shipping_address {
            Some(address) => ShippingDetails {
                address_match: false,
                address: Some(address),
                email: email.clone(),
            },
            None => ShippingDetails {
                address_match: true,
                address: None,
                email: None,
            },
        };

        Ok(Self {
            contact,
            billing: BillingDetails {
                address: billing_address,
                email,
            },
            shipping,
        })
    }

    /// The contact email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.contact.email
    }
}
