//! Each call completes within 200 ms on loopback.

use super::helpers::{abc_signup, spawn_service};
use registrar::user::services::GetUserRequest;
use std::future::Future;
use std::time::{Duration, Instant};

const LATENCY_BOUND: Duration = Duration::from_millis(200);

async fn within_bound<T>(label: &str, call: impl Future<Output = T>) -> T {
    let started = Instant::now();
    let output = call.await;
    let elapsed = started.elapsed();
    assert!(elapsed < LATENCY_BOUND, "{label} took {elapsed:?}");
    output
}

#[tokio::test(flavor = "multi_thread")]
async fn calls_complete_within_bound() -> eyre::Result<()> {
    let service = spawn_service().await?;
    let mut client = service.client().await?;

    within_bound("signup", client.sign_up(&abc_signup())).await?;

    let duplicate = within_bound("duplicate signup", client.sign_up(&abc_signup())).await;
    assert!(duplicate.is_err());

    within_bound("lookup", client.get_user(&GetUserRequest::new("0xabc"))).await?;

    let missing = within_bound(
        "missing lookup",
        client.get_user(&GetUserRequest::new("0xdef")),
    )
    .await;
    assert!(missing.is_err());
    Ok(())
}
