//! Validated user name and email types.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_USER_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 255;

/// Display handle chosen by the user at signup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Creates a validated user name.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyUserName`] when the value is empty after
    /// trimming, [`UserDomainError::SurroundingWhitespace`] when it starts or
    /// ends with whitespace, or [`UserDomainError::UserNameTooLong`] when it exceeds 100
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyUserName);
        }

        if trimmed.len() != raw.len() {
            return Err(UserDomainError::SurroundingWhitespace {
                field: "userName",
                value: raw,
            });
        }

        if raw.chars().count() > MAX_USER_NAME_LENGTH {
            return Err(UserDomainError::UserNameTooLong(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the user name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact email of the form `local@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a validated email.
    ///
    /// Only the shape is checked: exactly one `@`, non-empty local part and
    /// domain, and no whitespace anywhere, including around the value.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidEmail`] when the shape check fails or
    /// [`UserDomainError::EmailTooLong`] when it exceeds 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();

        if raw.chars().count() > MAX_EMAIL_LENGTH {
            return Err(UserDomainError::EmailTooLong(raw));
        }

        let well_formed = !raw.chars().any(char::is_whitespace)
            && raw.split_once('@').is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            });

        if !well_formed {
            return Err(UserDomainError::InvalidEmail(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the email as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
