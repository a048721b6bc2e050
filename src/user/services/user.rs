//! Service layer for user signup and lookup.
//!
//! Provides [`UserService`], which validates inbound requests into domain
//! values and delegates persistence to a [`UserRepository`]. Repository
//! errors are propagated unchanged so callers can tell a duplicate signup or
//! a missing user apart from other failures.

use crate::user::{
    domain::{Address, Email, NewUser, Profile, User, UserDomainError, UserName},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for signing up a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Unique chain-style address.
    pub address: String,
    /// Display handle.
    pub user_name: String,
    /// Contact email.
    pub email: String,
    /// Profile first name.
    pub first_name: String,
    /// Profile last name.
    pub last_name: String,
}

impl SignUpRequest {
    /// Creates a request from all mandatory signup fields.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        user_name: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            user_name: user_name.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Request payload for looking up a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUserRequest {
    /// Address of the user to look up.
    pub address: String,
}

impl GetUserRequest {
    /// Creates a lookup request.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Service-level errors for user operations.
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

impl UserServiceError {
    /// Returns `true` when the error reports a uniqueness violation.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::Repository(UserRepositoryError::DuplicateUser { .. })
        )
    }

    /// Returns `true` when the error reports a missing user.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(UserRepositoryError::NotFound(_)))
    }
}

/// Result type for user service operations.
pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// User signup and lookup orchestration service.
pub struct UserService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for UserService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> UserService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Signs up a new user together with its profile.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Domain`] when a field fails validation, or
    /// [`UserServiceError::Repository`] carrying
    /// [`UserRepositoryError::DuplicateUser`] when the address (or another
    /// unique field) is already registered.
    pub async fn signup(&self, request: SignUpRequest) -> UserServiceResult<User> {
        let SignUpRequest {
            address,
            user_name,
            email,
            first_name,
            last_name,
        } = request;

        let new_user = NewUser {
            address: Address::new(address)?,
            user_name: UserName::new(user_name)?,
            email: Email::new(email)?,
            profile: Profile::new(first_name, last_name)?,
        };

        let user = User::new(new_user, &*self.clock);
        let stored = self.repository.create(&user).await?;
        info!(address = %stored.address(), user_id = %stored.id(), "user signed up");
        Ok(stored)
    }

    /// Looks up a user and its profile by address.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Domain`] when the address fails
    /// validation, or [`UserServiceError::Repository`] carrying
    /// [`UserRepositoryError::NotFound`] when no user has that address.
    pub async fn get_user(&self, request: GetUserRequest) -> UserServiceResult<User> {
        let address = Address::new(request.address)?;
        let user = self.repository.find(&address).await?;
        debug!(address = %address, "user found");
        Ok(user)
    }
}
