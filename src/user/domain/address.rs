//! Validated user address type.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an address, matching the `VARCHAR(255)` column.
const MAX_ADDRESS_LENGTH: usize = 255;

/// Unique chain-style identifier of a user (e.g. `0xabc`).
///
/// Addresses are stored exactly as given: case is significant and
/// surrounding whitespace is rejected rather than stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates a validated address.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyAddress`] when the value is empty after
    /// trimming, [`UserDomainError::SurroundingWhitespace`] when it starts or
    /// ends with whitespace, [`UserDomainError::InvalidAddress`] when it
    /// contains whitespace, or [`UserDomainError::AddressTooLong`] when it exceeds 255
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyAddress);
        }

        if trimmed.len() != raw.len() {
            return Err(UserDomainError::SurroundingWhitespace {
                field: "address",
                value: raw,
            });
        }

        if raw.chars().count() > MAX_ADDRESS_LENGTH {
            return Err(UserDomainError::AddressTooLong(raw));
        }

        if raw.chars().any(char::is_whitespace) {
            return Err(UserDomainError::InvalidAddress(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
