//! Identifier types.
//!
//! Local identifiers (`LocalCustomerId`, `OrderId`) are the positive integer
//! keys the host store assigns. `ExternalCustomerId` is the opaque string the
//! processor hands back when a customer is created remotely.
//!
//! # Macro-based ID Types
//!
//! The `numeric_id_type!` macro generates the local identifier newtypes so
//! parsing, display and serialization stay identical across them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Macro to define a positive integer identifier with standard trait implementations.
///
/// This macro generates a newtype wrapper around `NonZeroU64` with implementations for:
/// - `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `Serialize`, `Deserialize` (as a JSON number)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<u64>`, `Into<u64>`
///
/// # Example
///
/// ```ignore
/// numeric_id_type!(MyId, "A custom identifier type.");
/// let id = MyId::new(42).unwrap();
/// let parsed: MyId = "42".parse().unwrap();
/// ```
macro_rules! numeric_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "u64", into = "u64")]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Create an identifier from a raw value.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Zero` if the value is zero.
            pub fn new(value: u64) -> Result<Self, IdError> {
                NonZeroU64::new(value).map(Self).ok_or(IdError::Zero)
            }

            /// Return the raw value.
            #[must_use]
            pub const fn get(&self) -> u64 {
                self.0.get()
            }

            /// Return the big-endian bytes of the value (8 bytes).
            #[must_use]
            pub const fn to_be_bytes(&self) -> [u8; 8] {
                self.0.get().to_be_bytes()
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value: u64 = s.trim().parse().map_err(|_| IdError::InvalidNumber)?;
                Self::new(value)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<u64> for $name {
            type Error = IdError;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.get()
            }
        }
    };
}

numeric_id_type!(LocalCustomerId, "A customer identifier in the host store.\n\nRegistered shoppers have one; guest orders do not.");
numeric_id_type!(OrderId, "An order identifier in the host store.");

/// A customer identifier assigned by the processor.
///
/// The processor owns the format, so the value is kept verbatim. The only
/// requirement is that it is not blank.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalCustomerId(String);

impl ExternalCustomerId {
    /// Create an identifier from the processor's value.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Blank` if the value is empty or whitespace only.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IdError::Blank);
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for ExternalCustomerId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for ExternalCustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalCustomerId({})", self.0)
    }
}

impl fmt::Display for ExternalCustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ExternalCustomerId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExternalCustomerId> for String {
    fn from(id: ExternalCustomerId) -> Self {
        id.0
    }
}

impl AsRef<str> for ExternalCustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a base-10 integer.
    #[error("invalid numeric identifier")]
    InvalidNumber,

    /// Local identifiers start at 1.
    #[error("identifier must not be zero")]
    Zero,

    /// The input is empty or whitespace only.
    #[error("identifier must not be blank")]
    Blank,
}
