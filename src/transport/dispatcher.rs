//! Routing of inbound calls to the user service.

use async_trait::async_trait;
use mockable::Clock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, error};

use super::RpcError;
use crate::user::{
    domain::User,
    ports::{UserRepository, UserRepositoryError},
    services::{GetUserRequest, SignUpRequest, UserService, UserServiceError},
};

/// Seam between the TCP server and the code answering calls.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Answers one call addressed to `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the error body sent back to the caller.
    async fn handle(&self, pattern: &str, data: Value) -> Result<Value, RpcError>;
}

/// Call names served by [`UserController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPattern {
    /// Create a user and its profile.
    SignUp,
    /// Look up a user by address.
    GetUser,
}

impl UserPattern {
    /// Returns the wire pattern.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignUp => "SignUp",
            Self::GetUser => "GetUser",
        }
    }
}

impl FromStr for UserPattern {
    type Err = RpcError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        match pattern {
            "SignUp" => Ok(Self::SignUp),
            "GetUser" => Ok(Self::GetUser),
            other => Err(RpcError::unknown_pattern(other)),
        }
    }
}

/// Controller exposing `SignUp` and `GetUser` over the message transport.
pub struct UserController<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    service: UserService<R, C>,
}

impl<R, C> UserController<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Wraps the user service.
    #[must_use]
    pub const fn new(service: UserService<R, C>) -> Self {
        Self { service }
    }

    /// Handles a `SignUp` call.
    ///
    /// # Errors
    ///
    /// `VALIDATION` for a malformed payload or invalid field,
    /// `DUPLICATE_USER` when the address is taken, `INTERNAL` otherwise.
    pub async fn sign_up(&self, data: Value) -> Result<Value, RpcError> {
        let request: SignUpRequest = decode_payload(data)?;
        let user = self.service.signup(request).await.map_err(reject)?;
        encode_user(&user)
    }

    /// Handles a `GetUser` call.
    ///
    /// # Errors
    ///
    /// `VALIDATION` for a malformed payload, `NOT_FOUND` when no user has
    /// the address, `INTERNAL` otherwise.
    pub async fn get_user(&self, data: Value) -> Result<Value, RpcError> {
        let request: GetUserRequest = decode_payload(data)?;
        let user = self.service.get_user(request).await.map_err(reject)?;
        encode_user(&user)
    }
}

#[async_trait]
impl<R, C> MessageHandler for UserController<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    async fn handle(&self, pattern: &str, data: Value) -> Result<Value, RpcError> {
        debug!(pattern, "dispatching call");
        match pattern.parse::<UserPattern>()? {
            UserPattern::SignUp => self.sign_up(data).await,
            UserPattern::GetUser => self.get_user(data).await,
        }
    }
}

fn decode_payload<T: DeserializeOwned>(data: Value) -> Result<T, RpcError> {
    serde_json::from_value(data).map_err(|err| RpcError::validation(err.to_string()))
}

fn encode_user(user: &User) -> Result<Value, RpcError> {
    serde_json::to_value(user).map_err(|err| {
        error!(error = %err, "failed to encode user");
        RpcError::internal()
    })
}

fn reject(err: UserServiceError) -> RpcError {
    match err {
        UserServiceError::Domain(domain) => RpcError::validation(domain.to_string()),
        UserServiceError::Repository(repo @ UserRepositoryError::DuplicateUser { .. }) => {
            RpcError::duplicate_user(repo.to_string())
        }
        UserServiceError::Repository(repo @ UserRepositoryError::NotFound(_)) => {
            RpcError::not_found(repo.to_string())
        }
        UserServiceError::Repository(repo) => {
            error!(error = %repo, "user call failed");
            RpcError::internal()
        }
    }
}
