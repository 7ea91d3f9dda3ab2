//! Link between a local customer and the processor's customer.

use serde::{Deserialize, Serialize};

use crate::ExternalCustomerId;

/// Metadata key under which the host store keeps the processor's customer id.
pub const CUSTOMER_ID_META_KEY: &str = "_acfw_customer_id";

/// Whether a local customer already exists on the processor side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "customer_id", rename_all = "snake_case")]
pub enum CustomerLink {
    /// Never created remotely; the next sync creates it.
    #[default]
    Unlinked,
    /// Created remotely under this id; the next sync updates it.
    Linked(ExternalCustomerId),
}

impl CustomerLink {
    /// Interpret a stored metadata value. Blank values mean unlinked.
    #[must_use]
    pub fn from_meta(value: Option<&str>) -> Self {
        value
            .and_then(|v| ExternalCustomerId::new(v).ok())
            .map_or(Self::Unlinked, Self::Linked)
    }

    /// The external id, when linked.
    #[must_use]
    pub const fn external_id(&self) -> Option<&ExternalCustomerId> {
        match self {
            Self::Unlinked => None,
            Self::Linked(id) => Some(id),
        }
    }

    /// Returns `true` when linked.
    #[must_use]
    pub const fn is_linked(&self) -> bool {
        matches!(self, Self::Linked(_))
    }
}
