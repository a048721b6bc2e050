//! Personal profile owned by a user.

use super::UserDomainError;
use serde::{Deserialize, Serialize};

const MAX_PROFILE_NAME_LENGTH: usize = 100;

/// First and last name of a user. Created and deleted together with its user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    first_name: String,
    last_name: String,
}

impl Profile {
    /// Creates a validated profile.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyProfileName`] when either name is empty
    /// after trimming, [`UserDomainError::SurroundingWhitespace`] when either
    /// starts or ends with whitespace, or
    /// [`UserDomainError::ProfileNameTooLong`] when either exceeds 100
    /// characters.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, UserDomainError> {
        Ok(Self {
            first_name: validate_name("firstName", first_name.into())?,
            last_name: validate_name("lastName", last_name.into())?,
        })
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

fn validate_name(field: &'static str, raw: String) -> Result<String, UserDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserDomainError::EmptyProfileName { field });
    }
    if trimmed.len() != raw.len() {
        return Err(UserDomainError::SurroundingWhitespace { field, value: raw });
    }
    if raw.chars().count() > MAX_PROFILE_NAME_LENGTH {
        return Err(UserDomainError::ProfileNameTooLong { field, value: raw });
    }
    Ok(raw)
}
