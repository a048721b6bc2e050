//! In-memory adapters for user persistence.

mod user_repository;

pub use user_repository::{InMemoryUserRepository, UniqueFields};
