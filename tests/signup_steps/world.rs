//! Shared world state for signup BDD scenarios.

use mockable::DefaultClock;
use registrar::transport::{ClientError, RpcClient, ServerShutdown, TcpServer, UserController};
use registrar::user::{
    adapters::memory::InMemoryUserRepository,
    domain::User,
    services::{SignUpRequest, UserService},
};
use rstest::fixture;
use std::sync::Arc;

/// Scenario world for signup behaviour tests.
#[derive(Default)]
pub struct SignupWorld {
    /// Client connected to the running service.
    pub client: Option<RpcClient>,
    /// Stops the service when the scenario ends.
    pub shutdown: Option<ServerShutdown>,
    /// User created by a `Given` step.
    pub signed_up: Option<User>,
    /// Result of the last call made by a `When` step.
    pub last_result: Option<Result<User, ClientError>>,
}

impl SignupWorld {
    /// Returns the connected client.
    ///
    /// # Errors
    ///
    /// Returns an error if the service has not been started.
    pub fn client(&mut self) -> eyre::Result<&mut RpcClient> {
        self.client
            .as_mut()
            .ok_or_else(|| eyre::eyre!("registrar service is not running"))
    }
}

impl Drop for SignupWorld {
    fn drop(&mut self) {
        if let Some(shutdown) = &self.shutdown {
            shutdown.shutdown();
        }
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SignupWorld {
    SignupWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Starts a service over a fresh in-memory repository and connects to it.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or reached.
pub async fn start_service() -> eyre::Result<(RpcClient, ServerShutdown)> {
    let controller = Arc::new(UserController::new(UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(DefaultClock),
    )));
    let server = TcpServer::bind("127.0.0.1:0", controller).await?;
    let addr = server.local_addr()?;
    let shutdown = server.shutdown_handle();
    tokio::spawn(server.serve());
    let client = RpcClient::connect(addr).await?;
    Ok((client, shutdown))
}

/// Builds a [`SignUpRequest`] with derived user name and email.
pub fn request_for(address: &str) -> SignUpRequest {
    let handle = address.trim_start_matches("0x");
    SignUpRequest::new(address, handle, format!("{handle}@x.com"), "A", "B")
}
