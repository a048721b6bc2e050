//! Database connection lifecycle.
//!
//! [`Database`] owns the single `PostgreSQL` connection pool shared by every
//! repository. It is created once by the composition root, connected at
//! startup and released exactly once at shutdown. Shutdown is driven by an
//! exit notification: hooks registered with
//! [`Database::enable_shutdown_hooks`] release the pool and then close the
//! hosting process through the [`HostProcess`] port.

mod config;
mod error;
mod host;
mod lifecycle;

pub use config::DatabaseConfig;
pub use error::{DatabaseError, DatabaseResult};
pub use host::HostProcess;
pub use lifecycle::{Database, DbPool};

#[cfg(test)]
pub use host::MockHostProcess;
