//! Exit notification stops the listener through the database hook.

use super::helpers::{memory_controller, spawn_service};
use registrar::app;
use registrar::database::{Database, DatabaseConfig};
use registrar::transport::RpcClient;
use registrar::user::services::GetUserRequest;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn exit_notification_stops_service() -> eyre::Result<()> {
    let database = Arc::new(Database::new(DatabaseConfig::new(
        "postgres://localhost/unused",
    )));
    let service = app::start(Arc::clone(&database), memory_controller(), "127.0.0.1:0").await?;
    let addr = service.local_addr();

    let mut client = RpcClient::connect(addr).await?;
    let running = tokio::spawn(service.run());

    database.notify_exit();
    tokio::time::timeout(Duration::from_secs(5), running).await??;

    assert!(!database.is_connected());
    let after = client
        .get_user(&GetUserRequest::new("0xabc"))
        .await;
    assert!(after.is_err(), "open connections are closed on shutdown");
    assert!(RpcClient::connect(addr).await.is_err());
    Ok(())
}

#[tokio::test]
async fn server_shutdown_handle_stops_accept_loop() -> eyre::Result<()> {
    let service = spawn_service().await?;
    let addr = service.addr;
    let handle = service.shutdown.clone();

    service.stop().await?;

    assert!(handle.is_shutdown());
    assert!(RpcClient::connect(addr).await.is_err());
    Ok(())
}
