//! User aggregate root.

use super::{Address, Email, Profile, UserId, UserName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated signup fields, ready to become a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique chain-style address.
    pub address: Address,
    /// Display handle.
    pub user_name: UserName,
    /// Contact email.
    pub email: Email,
    /// Owned profile.
    pub profile: Profile,
}

/// Registered user together with its profile.
///
/// Serializes to the wire shape returned by the `SignUp` and `GetUser`
/// calls: `{id, address, userName, email, createdAt, profile}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    address: Address,
    user_name: UserName,
    email: Email,
    created_at: DateTime<Utc>,
    profile: Profile,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted address.
    pub address: Address,
    /// Persisted user name.
    pub user_name: UserName,
    /// Persisted email.
    pub email: Email,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted profile.
    pub profile: Profile,
}

impl User {
    /// Creates a new user with a fresh identifier.
    #[must_use]
    pub fn new(new_user: NewUser, clock: &impl Clock) -> Self {
        let NewUser {
            address,
            user_name,
            email,
            profile,
        } = new_user;
        Self {
            id: UserId::new(),
            address,
            user_name,
            email,
            created_at: clock.utc(),
            profile,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            address: data.address,
            user_name: data.user_name,
            email: data.email,
            created_at: data.created_at,
            profile: data.profile,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the unique address.
    #[must_use]
    pub const fn address(&self) -> &Address {
        &self.address
    }

    /// Returns the user name.
    #[must_use]
    pub const fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Returns the email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the owned profile.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }
}
