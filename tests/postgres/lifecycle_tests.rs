//! Connection lifecycle against a live `PostgreSQL` server.

use super::helpers::test_database_url;
use async_trait::async_trait;
use registrar::database::{Database, DatabaseConfig, HostProcess};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Host that records how often it was closed and whether the database was
/// still connected at that point.
struct RecordingHost {
    database: Arc<Database>,
    closes: AtomicUsize,
    connected_at_close: AtomicUsize,
}

#[async_trait]
impl HostProcess for RecordingHost {
    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.database.is_connected() {
            self.connected_at_close.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "starts or connects to a PostgreSQL server; run with --ignored"]
async fn connect_and_disconnect_twice() -> eyre::Result<()> {
    let url = test_database_url().await?;
    let database = Database::new(DatabaseConfig::new(url));

    database.connect().await?;
    assert!(database.is_connected());
    database.connect().await?;

    assert!(database.disconnect().await);
    assert!(!database.disconnect().await);
    assert!(!database.is_connected());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "starts or connects to a PostgreSQL server; run with --ignored"]
async fn shutdown_hook_releases_pool_then_closes_host_once() -> eyre::Result<()> {
    let url = test_database_url().await?;
    let database = Arc::new(Database::new(DatabaseConfig::new(url)));
    database.connect().await?;
    let host = Arc::new(RecordingHost {
        database: Arc::clone(&database),
        closes: AtomicUsize::new(0),
        connected_at_close: AtomicUsize::new(0),
    });

    let hook = database.enable_shutdown_hooks(Arc::clone(&host));
    database.notify_exit();
    database.notify_exit();
    tokio::time::timeout(Duration::from_secs(5), hook).await??;

    assert_eq!(host.closes.load(Ordering::SeqCst), 1);
    assert_eq!(host.connected_at_close.load(Ordering::SeqCst), 0);
    assert!(!database.is_connected());
    Ok(())
}
