//! Shared helpers for TCP service tests.

use mockable::DefaultClock;
use registrar::transport::{RpcClient, ServerShutdown, TcpServer, UserController};
use registrar::user::{
    adapters::memory::InMemoryUserRepository,
    services::{SignUpRequest, UserService},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Controller type served in tests.
pub type MemoryController = UserController<InMemoryUserRepository, DefaultClock>;

/// A server running on an ephemeral loopback port.
pub struct TestService {
    /// Bound address.
    pub addr: SocketAddr,
    /// Stops the accept loop.
    pub shutdown: ServerShutdown,
    task: Option<JoinHandle<()>>,
}

impl TestService {
    /// Opens a client connection to the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened.
    pub async fn client(&self) -> eyre::Result<RpcClient> {
        Ok(RpcClient::connect(self.addr).await?)
    }

    /// Stops the accept loop and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop does not stop within five seconds.
    pub async fn stop(mut self) -> eyre::Result<()> {
        self.shutdown.shutdown();
        if let Some(task) = self.task.take() {
            tokio::time::timeout(Duration::from_secs(5), task).await??;
        }
        Ok(())
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.shutdown();
    }
}

/// Builds a controller over a fresh in-memory repository.
#[must_use]
pub fn memory_controller() -> Arc<MemoryController> {
    Arc::new(UserController::new(UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(DefaultClock),
    )))
}

/// Starts a service on `127.0.0.1:0`.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn spawn_service() -> eyre::Result<TestService> {
    let server = TcpServer::bind("127.0.0.1:0", memory_controller()).await?;
    let addr = server.local_addr()?;
    let shutdown = server.shutdown_handle();
    let task = tokio::spawn(server.serve());
    Ok(TestService {
        addr,
        shutdown,
        task: Some(task),
    })
}

/// The signup request used across scenarios.
#[must_use]
pub fn abc_signup() -> SignUpRequest {
    SignUpRequest::new("0xabc", "abc", "abc@x.com", "A", "B")
}
