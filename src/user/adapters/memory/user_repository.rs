//! In-memory user repository for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{Address, Email, User, UserName},
    ports::{UniqueField, UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Which optional fields the in-memory store treats as unique.
///
/// The address is always unique. User name and email uniqueness mirror the
/// optional `PostgreSQL` indexes and are enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueFields {
    /// Reject a second user with the same user name.
    pub user_name: bool,
    /// Reject a second user with the same email.
    pub email: bool,
}

impl UniqueFields {
    /// Only the address is unique.
    #[must_use]
    pub const fn address_only() -> Self {
        Self {
            user_name: false,
            email: false,
        }
    }
}

impl Default for UniqueFields {
    fn default() -> Self {
        Self {
            user_name: true,
            email: true,
        }
    }
}

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
    unique: UniqueFields,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<Address, User>,
    user_name_index: HashMap<UserName, Address>,
    email_index: HashMap<Email, Address>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository enforcing all uniqueness constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository with the given uniqueness rules.
    #[must_use]
    pub fn with_unique_fields(unique: UniqueFields) -> Self {
        Self {
            state: Arc::default(),
            unique,
        }
    }

    /// Returns the number of stored users.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn len(&self) -> UserRepositoryResult<usize> {
        let state = self.state.read().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.users.len())
    }

    /// Returns `true` when no user is stored.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn is_empty(&self) -> UserRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> UserRepositoryResult<User> {
        let mut state = self.state.write().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        if state.users.contains_key(user.address()) {
            return Err(UserRepositoryError::DuplicateUser {
                field: UniqueField::Address,
                value: user.address().to_string(),
            });
        }

        if self.unique.user_name && state.user_name_index.contains_key(user.user_name()) {
            return Err(UserRepositoryError::DuplicateUser {
                field: UniqueField::UserName,
                value: user.user_name().to_string(),
            });
        }

        if self.unique.email && state.email_index.contains_key(user.email()) {
            return Err(UserRepositoryError::DuplicateUser {
                field: UniqueField::Email,
                value: user.email().to_string(),
            });
        }

        state
            .user_name_index
            .insert(user.user_name().clone(), user.address().clone());
        state
            .email_index
            .insert(user.email().clone(), user.address().clone());
        state.users.insert(user.address().clone(), user.clone());
        Ok(user.clone())
    }

    async fn find(&self, address: &Address) -> UserRepositoryResult<User> {
        let state = self.state.read().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .users
            .get(address)
            .cloned()
            .ok_or_else(|| UserRepositoryError::NotFound(address.clone()))
    }
}
