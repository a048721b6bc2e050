//! Error types for the database connection lifecycle.

use std::sync::Arc;
use thiserror::Error;

/// Result type for connection lifecycle operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors returned by [`super::Database`].
#[derive(Debug, Clone, Error)]
pub enum DatabaseError {
    /// The configured connection string is not a `PostgreSQL` URL.
    #[error("invalid database connection string: {0}")]
    InvalidConnectionString(String),

    /// The database could not be reached.
    #[error("database connection failed: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// The connection was released and no further queries are accepted.
    #[error("database connection is closed")]
    Disconnected,
}

impl DatabaseError {
    /// Wraps a connection failure.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Returns `true` for failures raised while establishing the connection.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::InvalidConnectionString(_) | Self::Connection(_))
    }
}
