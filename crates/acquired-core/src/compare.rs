//! Structural address comparison.

use std::collections::BTreeMap;

use crate::AddressFields;

/// Fields that identify a person rather than a place.
pub const CONTACT_FIELDS: [&str; 2] = ["email", "phone"];

fn location_fields<A: AddressFields + ?Sized>(address: &A) -> BTreeMap<&'static str, String> {
    let mut fields = address.address_fields();
    for key in CONTACT_FIELDS {
        fields.remove(key);
    }
    fields
}

/// Returns `true` if both addresses describe the same place.
///
/// Contact fields are ignored; every other field must match exactly,
/// including presence.
#[must_use]
pub fn addresses_equal<A, B>(a: &A, b: &B) -> bool
where
    A: AddressFields + ?Sized,
    B: AddressFields + ?Sized,
{
    location_fields(a) == location_fields(b)
}
