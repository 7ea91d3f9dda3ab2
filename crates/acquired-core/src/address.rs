//! Raw and normalized address types.
//!
//! [`RawAddress`] is the host store's billing or shipping field bag made
//! explicit: every key is optional and nothing is trusted. The normalized
//! types are what the processor accepts, produced by [`crate::normalize`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Email;

/// A billing or shipping address exactly as the host store returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAddress {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// First address line.
    pub address_1: Option<String>,
    /// Second address line.
    pub address_2: Option<String>,
    /// City or town.
    pub city: Option<String>,
    /// Postal code.
    pub postcode: Option<String>,
    /// ISO 3166-1 alpha-2 country code, any case.
    pub country: Option<String>,
    /// State or county code.
    pub state: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
}

impl RawAddress {
    /// Returns `true` if no field carries a non-blank value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().all(|(_, value)| value.trim().is_empty())
    }

    /// Returns the email when it is present and not blank.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// Fills a blank email with `fallback`.
    ///
    /// Accounts created with only an email often have an empty billing email.
    pub fn backfill_email(&mut self, fallback: Option<&str>) {
        if self.email().is_some() {
            return;
        }
        if let Some(fallback) = fallback.filter(|e| !e.trim().is_empty()) {
            self.email = Some(fallback.to_owned());
        }
    }

    fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("address_1", &self.address_1),
            ("address_2", &self.address_2),
            ("city", &self.city),
            ("postcode", &self.postcode),
            ("country", &self.country),
            ("state", &self.state),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
    }
}

/// The identity part of a customer, validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContact {
    /// Given name, or empty when the raw value was unusable.
    pub first_name: String,
    /// Family name, or empty when the raw value was unusable.
    pub last_name: String,
    /// Always a valid address.
    pub email: Email,
}

/// An address in the processor's canonical shape.
///
/// Fields that failed validation are empty strings rather than missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    /// First address line.
    pub line_1: String,
    /// Second address line.
    pub line_2: String,
    /// City or town.
    pub city: String,
    /// Postal code.
    pub postcode: String,
    /// Lowercase country code.
    pub country_code: String,
    /// Lowercase state code, US addresses only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Exposes an address as a flat, key-sorted field map.
///
/// Implemented by raw and normalized addresses so both can be compared
/// with [`crate::addresses_equal`].
pub trait AddressFields {
    /// Returns every present field keyed by its wire name.
    fn address_fields(&self) -> BTreeMap<&'static str, String>;
}

impl AddressFields for RawAddress {
    fn address_fields(&self) -> BTreeMap<&'static str, String> {
        self.fields()
            .map(|(key, value)| (key, value.to_owned()))
            .collect()
    }
}

impl AddressFields for NormalizedAddress {
    fn address_fields(&self) -> BTreeMap<&'static str, String> {
        let mut fields = BTreeMap::from([
            ("line_1", self.line_1.clone()),
            ("line_2", self.line_2.clone()),
            ("city", self.city.clone()),
            ("postcode", self.postcode.clone()),
            ("country_code", self.country_code.clone()),
        ]);
        if let Some(state) = &self.state {
            fields.insert("state", state.clone());
        }
        fields
    }
}
