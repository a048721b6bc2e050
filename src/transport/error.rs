//! Error bodies returned to callers in the `err` field of a reply.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcErrorKind {
    /// The request payload failed validation.
    Validation,
    /// A user with the same unique field already exists.
    DuplicateUser,
    /// No user exists for the requested address.
    NotFound,
    /// No handler is registered for the request pattern.
    UnknownPattern,
    /// Unexpected server-side failure. Details stay in the server log.
    Internal,
}

impl RpcErrorKind {
    /// Returns the wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::DuplicateUser => "DUPLICATE_USER",
            Self::NotFound => "NOT_FOUND",
            Self::UnknownPattern => "UNKNOWN_PATTERN",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for RpcErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn error_status() -> String {
    "error".to_owned()
}

/// Structured failure carried by a reply: `{status, code, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    /// Always `"error"`.
    #[serde(default = "error_status")]
    pub status: String,
    /// Failure category.
    pub code: RpcErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl RpcError {
    /// Creates an error body of the given kind.
    #[must_use]
    pub fn new(code: RpcErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: error_status(),
            code,
            message: message.into(),
        }
    }

    /// Payload validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Validation, message)
    }

    /// Uniqueness conflict.
    #[must_use]
    pub fn duplicate_user(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::DuplicateUser, message)
    }

    /// Missing user.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::NotFound, message)
    }

    /// No handler for `pattern`.
    #[must_use]
    pub fn unknown_pattern(pattern: &str) -> Self {
        Self::new(
            RpcErrorKind::UnknownPattern,
            format!("There is no matching message handler defined in the remote service for pattern {pattern}"),
        )
    }

    /// Opaque server failure.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(RpcErrorKind::Internal, "Internal server error")
    }
}
