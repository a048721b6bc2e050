//! Port for the process hosting the database connection.

use async_trait::async_trait;

/// Process that must not outlive its database connection.
///
/// The shutdown hook calls [`HostProcess::close`] once the exit notification
/// fires and the pool has been released.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostProcess: Send + Sync {
    /// Stops the hosting process.
    async fn close(&self);
}
