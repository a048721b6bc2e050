//! Domain model for registered users and their profiles.
//!
//! A user is identified by a unique chain-style address and owns exactly one
//! profile. All infrastructure concerns are kept outside the domain boundary.

mod address;
mod contact;
mod error;
mod ids;
mod profile;
mod user;

pub use address::Address;
pub use contact::{Email, UserName};
pub use error::UserDomainError;
pub use ids::UserId;
pub use profile::Profile;
pub use user::{NewUser, PersistedUserData, User};
