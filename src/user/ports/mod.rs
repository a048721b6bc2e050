//! Port contracts for user persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the user service.

pub mod repository;

pub use repository::{UniqueField, UserRepository, UserRepositoryError, UserRepositoryResult};
