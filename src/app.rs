//! Composition root wiring the database, user service and listener.

use mockable::DefaultClock;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::ToSocketAddrs;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::database::{Database, DatabaseError};
use crate::transport::{MessageHandler, TcpServer, UserController};
use crate::user::{adapters::postgres::PostgresUserRepository, services::UserService};

/// Handler type served by [`bootstrap`].
pub type PostgresUserController = UserController<PostgresUserRepository, DefaultClock>;

/// Failures that prevent the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The database could not be connected.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested listener address.
        addr: String,
        /// Socket error.
        #[source]
        source: io::Error,
    },
}

/// A started service: connected database, bound listener and registered
/// shutdown hook.
pub struct RunningService<H: ?Sized> {
    database: Arc<Database>,
    server: TcpServer<H>,
    hook: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl<H> RunningService<H>
where
    H: MessageHandler + ?Sized + 'static,
{
    /// Returns the bound listener address.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the database lifecycle manager. Call
    /// [`Database::notify_exit`] on it to stop the service.
    #[must_use]
    pub const fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// Serves calls until the exit notification fires, then waits for the
    /// shutdown hook to finish.
    pub async fn run(self) {
        let Self {
            database,
            server,
            hook,
            ..
        } = self;

        server.serve().await;
        database.notify_exit();
        if let Err(err) = hook.await {
            warn!(error = %err, "shutdown hook failed");
        }
        info!("API Microservice stopped");
    }
}

/// Connects the database and starts the `SignUp`/`GetUser` service on the
/// configured address.
///
/// # Errors
///
/// Returns [`StartupError::Database`] when the database is unreachable or
/// misconfigured and [`StartupError::Bind`] when the listener address is
/// unavailable.
pub async fn bootstrap(
    config: &ServiceConfig,
) -> Result<RunningService<PostgresUserController>, StartupError> {
    let database = Arc::new(Database::new(config.database.clone()));
    database.connect().await?;

    let repository = Arc::new(PostgresUserRepository::new(Arc::clone(&database)));
    let service = UserService::new(repository, Arc::new(DefaultClock));
    let controller = Arc::new(UserController::new(service));

    let started = start(Arc::clone(&database), controller, config.listen_addr()).await;
    if started.is_err() {
        database.disconnect().await;
    }
    started
}

/// Binds `handler` on `addr` and registers the database shutdown hook that
/// closes the listener.
///
/// `database` is expected to be connected already; it is released when the
/// exit notification fires.
///
/// # Errors
///
/// Returns [`StartupError::Bind`] when the address cannot be bound.
pub async fn start<H, A>(
    database: Arc<Database>,
    handler: Arc<H>,
    addr: A,
) -> Result<RunningService<H>, StartupError>
where
    H: MessageHandler + ?Sized + 'static,
    A: ToSocketAddrs + ToString,
{
    let describe = addr.to_string();
    let bind_error = |source| StartupError::Bind {
        addr: describe.clone(),
        source,
    };

    let server = TcpServer::bind(addr, handler).await.map_err(bind_error)?;
    let local_addr = server.local_addr().map_err(bind_error)?;
    let hook = database.enable_shutdown_hooks(Arc::new(server.shutdown_handle()));

    info!(%local_addr, "API Microservice is listening");
    Ok(RunningService {
        database,
        server,
        hook,
        local_addr,
    })
}

/// Fires the database exit notification once `signal` resolves.
///
/// A listener that fails leaves the service running.
///
/// # Errors
///
/// Returns the listener's error without notifying `database`.
pub async fn exit_on_signal<F>(database: &Database, signal: F) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    signal.await?;
    info!("shutdown signal received");
    database.notify_exit();
    Ok(())
}
