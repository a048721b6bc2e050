//! Connection lifecycle manager for the shared `PostgreSQL` pool.

use super::{DatabaseConfig, DatabaseError, DatabaseResult, HostProcess};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// `PostgreSQL` connection pool type shared by repository adapters.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

const POSTGRES_SCHEMES: [&str; 2] = ["postgres", "postgresql"];

/// Owner of the database client for the lifetime of the process.
#[derive(Debug)]
pub struct Database {
    config: DatabaseConfig,
    pool: RwLock<Option<DbPool>>,
    exit: CancellationToken,
}

impl Database {
    /// Creates a disconnected manager for the given settings.
    #[must_use]
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
            exit: CancellationToken::new(),
        }
    }

    /// Returns the settings this manager connects with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Establishes the connection pool.
    ///
    /// At least one connection is opened before this returns, so an
    /// unreachable server is reported here rather than on the first query.
    /// Calling `connect` while already connected does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::InvalidConnectionString`] when the URL is not
    /// a `PostgreSQL` connection string, or [`DatabaseError::Connection`] when
    /// no connection could be made within the configured timeout.
    pub async fn connect(&self) -> DatabaseResult<()> {
        info!("Initialising database connection");

        if self.is_connected() {
            debug!("database already connected");
            return Ok(());
        }

        validate_connection_string(&self.config.url)?;

        let manager = ConnectionManager::<PgConnection>::new(self.config.url.clone());
        let max_connections = self.config.max_connections;
        let connect_timeout = self.config.connect_timeout;
        let pool = tokio::task::spawn_blocking(move || {
            Pool::builder()
                .max_size(max_connections)
                .min_idle(Some(1))
                .connection_timeout(connect_timeout)
                .build(manager)
        })
        .await
        .map_err(DatabaseError::connection)?
        .map_err(DatabaseError::connection)?;

        let mut slot = self.pool.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(pool);
        }
        drop(slot);

        info!(max_connections, "database connection established");
        Ok(())
    }

    /// Releases the connection pool.
    ///
    /// Returns `true` when a live pool was released and `false` when the
    /// manager was already disconnected.
    pub async fn disconnect(&self) -> bool {
        let released = self
            .pool
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(pool) = released else {
            debug!("database already disconnected");
            return false;
        };

        // Closing pooled connections blocks on socket writes.
        if let Err(err) = tokio::task::spawn_blocking(move || drop(pool)).await {
            warn!(error = %err, "releasing database connections failed");
        }
        info!("database connection released");
        true
    }

    /// Returns `true` while a pool is held.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.pool
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns a handle to the live pool.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Disconnected`] when `connect` has not
    /// succeeded or the pool has been released.
    pub fn pool(&self) -> DatabaseResult<DbPool> {
        self.pool
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(DatabaseError::Disconnected)
    }

    /// Fires the exit notification observed by registered shutdown hooks.
    ///
    /// Firing more than once has no further effect.
    pub fn notify_exit(&self) {
        if !self.exit.is_cancelled() {
            debug!("database exit notification fired");
        }
        self.exit.cancel();
    }

    /// Returns `true` once the exit notification has fired.
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.exit.is_cancelled()
    }

    /// Registers a hook that closes `host` when the exit notification fires.
    ///
    /// The hook logs its intent, releases the pool and then calls
    /// [`HostProcess::close`] once. Must be called from within a Tokio
    /// runtime; the returned handle completes after `close` returns.
    pub fn enable_shutdown_hooks<H>(self: &Arc<Self>, host: Arc<H>) -> JoinHandle<()>
    where
        H: HostProcess + ?Sized + 'static,
    {
        let database = Arc::clone(self);
        let exit = self.exit.clone();
        debug!("database shutdown hook registered");
        tokio::spawn(async move {
            exit.cancelled().await;
            info!("Closing database connection");
            database.disconnect().await;
            host.close().await;
        })
    }
}

fn validate_connection_string(url: &str) -> DatabaseResult<()> {
    let trimmed = url.trim();
    let valid = match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            POSTGRES_SCHEMES
                .iter()
                .any(|expected| scheme.eq_ignore_ascii_case(expected))
                && !rest.is_empty()
        }
        // libpq key/value form, e.g. `host=localhost dbname=registrar`.
        None => {
            !trimmed.is_empty()
                && trimmed.split_whitespace().all(|pair| {
                    pair.split_once('=').is_some_and(|(key, _)| {
                        !key.is_empty() && key.chars().all(|c| c.is_ascii_lowercase() || c == '_')
                    })
                })
        }
    };

    if valid {
        Ok(())
    } else {
        Err(DatabaseError::InvalidConnectionString(url.to_owned()))
    }
}
