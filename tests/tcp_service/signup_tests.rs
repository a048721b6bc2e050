//! Signup and lookup over TCP.

use super::helpers::{abc_signup, spawn_service};
use registrar::transport::{ClientError, RpcErrorKind};
use registrar::user::services::{GetUserRequest, SignUpRequest};

fn rejection_code(err: &ClientError) -> Option<RpcErrorKind> {
    err.rejection().map(|body| body.code)
}

#[tokio::test]
async fn abc_signup_duplicate_and_lookup() -> eyre::Result<()> {
    let service = spawn_service().await?;
    let mut client = service.client().await?;

    let created = client.sign_up(&abc_signup()).await?;
    assert_eq!(created.address().as_str(), "0xabc");
    assert_eq!(created.user_name().as_str(), "abc");
    assert_eq!(created.email().as_str(), "abc@x.com");
    assert_eq!(created.profile().first_name(), "A");
    assert_eq!(created.profile().last_name(), "B");

    let duplicate = client
        .sign_up(&abc_signup())
        .await
        .expect_err("second signup is rejected");
    assert_eq!(rejection_code(&duplicate), Some(RpcErrorKind::DuplicateUser));

    let found = client.get_user(&GetUserRequest::new("0xabc")).await?;
    assert_eq!(found, created);

    let missing = client
        .get_user(&GetUserRequest::new("0xdef"))
        .await
        .expect_err("unknown address is rejected");
    assert_eq!(rejection_code(&missing), Some(RpcErrorKind::NotFound));
    Ok(())
}

#[tokio::test]
async fn rejected_call_keeps_connection_usable() -> eyre::Result<()> {
    let service = spawn_service().await?;
    let mut client = service.client().await?;

    let invalid = SignUpRequest::new("0xabc", "abc", "no-at-sign", "A", "B");
    let err = client
        .sign_up(&invalid)
        .await
        .expect_err("invalid email is rejected");
    assert_eq!(rejection_code(&err), Some(RpcErrorKind::Validation));

    let created = client.sign_up(&abc_signup()).await?;
    assert_eq!(created.address().as_str(), "0xabc");
    Ok(())
}

#[tokio::test]
async fn users_are_shared_across_connections() -> eyre::Result<()> {
    let service = spawn_service().await?;
    let mut writer = service.client().await?;
    let mut reader = service.client().await?;

    let created = writer.sign_up(&abc_signup()).await?;
    let found = reader.get_user(&GetUserRequest::new("0xabc")).await?;

    assert_eq!(found, created);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_signups_have_one_winner() -> eyre::Result<()> {
    let service = spawn_service().await?;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let mut client = service.client().await?;
        tasks.push(tokio::spawn(async move {
            client.sign_up(&abc_signup()).await
        }));
    }

    let mut created = 0;
    let mut duplicates = 0;
    for task in tasks {
        match task.await? {
            Ok(_) => created += 1,
            Err(err) if rejection_code(&err) == Some(RpcErrorKind::DuplicateUser) => {
                duplicates += 1;
            }
            Err(err) => return Err(eyre::eyre!("unexpected failure: {err}")),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 7);
    Ok(())
}
