//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The address is empty after trimming.
    #[error("address must not be empty")]
    EmptyAddress,

    /// The address contains whitespace between its characters.
    #[error("address '{0}' must not contain whitespace")]
    InvalidAddress(String),

    /// The address exceeds the 255-character storage limit.
    #[error("address exceeds 255 character limit: {0}")]
    AddressTooLong(String),

    /// The user name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyUserName,

    /// The user name exceeds the 100-character storage limit.
    #[error("user name exceeds 100 character limit: {0}")]
    UserNameTooLong(String),

    /// The email is not of the form `local@domain`.
    #[error("email '{0}' is not a valid address")]
    InvalidEmail(String),

    /// The email exceeds the 255-character storage limit.
    #[error("email exceeds 255 character limit: {0}")]
    EmailTooLong(String),

    /// A field starts or ends with whitespace.
    #[error("{field} must not start or end with whitespace: '{value}'")]
    SurroundingWhitespace {
        /// Wire name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// A profile name is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyProfileName {
        /// Name of the offending profile field.
        field: &'static str,
    },

    /// A profile name exceeds the 100-character storage limit.
    #[error("{field} exceeds 100 character limit: {value}")]
    ProfileNameTooLong {
        /// Name of the offending profile field.
        field: &'static str,
        /// Rejected value.
        value: String,
    },
}
