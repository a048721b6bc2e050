//! Repository port for user persistence and lookup.

use crate::user::domain::{Address, User};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user and its profile as one unit.
    ///
    /// Returns the record as it was stored.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUser`] when a unique field
    /// collides with an existing user.
    async fn create(&self, user: &User) -> UserRepositoryResult<User>;

    /// Finds a user and its profile by address.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when no user has the given
    /// address.
    async fn find(&self, address: &Address) -> UserRepositoryResult<User>;
}

/// User field guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    /// The user address.
    Address,
    /// The user name.
    UserName,
    /// The contact email.
    Email,
}

impl UniqueField {
    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::UserName => "userName",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// A user with the same value for a unique field already exists.
    #[error("a user with {field} '{value}' already exists")]
    DuplicateUser {
        /// Field whose constraint was violated.
        field: UniqueField,
        /// Colliding value.
        value: String,
    },

    /// No user has the requested address.
    #[error("user not found: {0}")]
    NotFound(Address),

    /// The database connection is not available.
    #[error("database unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a connection lifecycle error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
