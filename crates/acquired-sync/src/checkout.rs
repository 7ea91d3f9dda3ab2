//! Customer data embedded in a payment link request.

use serde::ser::{Serialize, SerializeMap, Serializer};

use acquired_core::{CustomerPayload, ExternalCustomerId};

/// The `customer` member of a payment link request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutCustomer {
    /// The customer exists remotely; reference it by id.
    Stored {
        /// The processor's customer id.
        customer_id: ExternalCustomerId,
    },
    /// Guest checkout, or a registered customer whose sync failed: send the
    /// customer inline.
    Inline(CustomerPayload),
    /// Nothing usable could be built from the order.
    Empty,
}

impl CheckoutCustomer {
    /// The stored customer id, if any.
    #[must_use]
    pub const fn customer_id(&self) -> Option<&ExternalCustomerId> {
        match self {
            Self::Stored { customer_id } => Some(customer_id),
            Self::Inline(_) | Self::Empty => None,
        }
    }

    /// Returns `true` if the payment link will reference a stored customer.
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }

    /// The fragment as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for CheckoutCustomer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Stored { customer_id } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("customer_id", customer_id)?;
                map.end()
            }
            Self::Inline(payload) => payload.serialize(serializer),
            Self::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}
