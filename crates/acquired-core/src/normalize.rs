//! Address normalization.
//!
//! Turns raw host-store fields into the shape the processor accepts. Fields
//! that fail validation are blanked instead of rejected, so a half-filled
//! billing form still produces a customer. The email is the exception: a
//! contact without a valid email is no contact at all.
//!
//! | Field                  | Rule                                   | Max chars |
//! |------------------------|----------------------------------------|-----------|
//! | `first_name`/`last_name` | letters, `.`, `-`, backtick, `'`, space | 22      |
//! | `email`                | [`Email::parse`], otherwise reject     | -         |
//! | `line_1`/`line_2`      | letters, digits, `. , / - &`, space    | 50        |
//! | `city`                 | letters, digits, `. , / - &`, space    | 40        |
//! | `postcode`             | accepted as is                         | 40        |
//! | `country_code`         | accepted as is, lowercased             | -         |
//! | `state`                | lowercased, only when country is `us`  | -         |

use std::sync::LazyLock;

use regex::Regex;

use crate::{Email, NormalizedAddress, NormalizedContact, RawAddress};

/// Maximum length of a first or last name.
pub const NAME_MAX_CHARS: usize = 22;

/// Maximum length of an address line.
pub const LINE_MAX_CHARS: usize = 50;

/// Maximum length of a city.
pub const CITY_MAX_CHARS: usize = 40;

/// Maximum length of a postcode.
pub const POSTCODE_MAX_CHARS: usize = 40;

/// The only country for which a state is sent.
pub const STATE_COUNTRY: &str = "us";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}.\- `']+$").expect("Invalid regex"));

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}.,/\-\& ]+$").expect("Invalid regex"));

/// Returns `true` if `value` is an acceptable first or last name.
#[must_use]
pub fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

/// Returns `true` if `value` is an acceptable address line or city.
#[must_use]
pub fn is_valid_address_line(value: &str) -> bool {
    ADDRESS_RE.is_match(value)
}

/// Keeps at most `max_chars` characters of `value`.
#[must_use]
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => value[..byte_index].to_owned(),
        None => value.to_owned(),
    }
}

fn name_field(value: Option<&str>) -> String {
    match value {
        Some(v) if is_valid_name(v) => truncate_chars(v, NAME_MAX_CHARS),
        _ => String::new(),
    }
}

fn address_field(value: Option<&str>, max_chars: usize) -> String {
    match value {
        Some(v) if is_valid_address_line(v) => truncate_chars(v, max_chars),
        _ => String::new(),
    }
}

/// Extracts the customer identity from a raw address.
///
/// Returns `None` when the email is missing or invalid. Names that fail
/// validation come back empty.
#[must_use]
pub fn normalize_contact(raw: &RawAddress) -> Option<NormalizedContact> {
    let email = Email::parse(raw.email.as_deref()?).ok()?;

    Some(NormalizedContact {
        first_name: name_field(raw.first_name.as_deref()),
        last_name: name_field(raw.last_name.as_deref()),
        email,
    })
}

/// Reshapes a raw address into the processor's address object.
///
/// Never fails: invalid lines and cities are blanked.
#[must_use]
pub fn normalize_address(raw: &RawAddress) -> NormalizedAddress {
    let country_code = raw
        .country
        .as_deref()
        .unwrap_or_default()
        .to_ascii_lowercase();

    let state = raw
        .state
        .as_deref()
        .filter(|s| country_code == STATE_COUNTRY && !s.is_empty())
        .map(str::to_ascii_lowercase);

    NormalizedAddress {
        line_1: address_field(raw.address_1.as_deref(), LINE_MAX_CHARS),
        line_2: address_field(raw.address_2.as_deref(), LINE_MAX_CHARS),
        city: address_field(raw.city.as_deref(), CITY_MAX_CHARS),
        postcode: truncate_chars(raw.postcode.as_deref().unwrap_or_default(), POSTCODE_MAX_CHARS),
        country_code,
        state,
    }
}
