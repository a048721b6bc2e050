//! Repository behaviour against `PostgreSQL`.

use super::helpers::{repository, test_database_url, unique_token, user_with_token};
use mockable::DefaultClock;
use registrar::user::{
    domain::{Address, Email, NewUser, Profile, User, UserName},
    ports::{UniqueField, UserRepository, UserRepositoryError},
};

#[tokio::test(flavor = "multi_thread")]
#[ignore = "starts or connects to a PostgreSQL server; run with --ignored"]
async fn create_then_find_returns_same_record() -> eyre::Result<()> {
    let url = test_database_url().await?;
    let (_database, repo) = repository(&url).await?;
    let user = user_with_token(&unique_token())?;

    let stored = repo.create(&user).await?;
    let found = repo.find(user.address()).await?;

    assert_eq!(stored.id(), user.id());
    assert_eq!(found.id(), user.id());
    assert_eq!(found.address(), user.address());
    assert_eq!(found.user_name(), user.user_name());
    assert_eq!(found.email(), user.email());
    assert_eq!(found.profile(), user.profile());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "starts or connects to a PostgreSQL server; run with --ignored"]
async fn duplicate_address_is_rejected_and_first_record_kept() -> eyre::Result<()> {
    let url = test_database_url().await?;
    let (_database, repo) = repository(&url).await?;
    let token = unique_token();
    let first = user_with_token(&token)?;
    repo.create(&first).await?;

    let other = unique_token();
    let clash = User::new(
        NewUser {
            address: first.address().clone(),
            user_name: UserName::new(format!("user_{other}"))?,
            email: Email::new(format!("{other}@example.com"))?,
            profile: Profile::new("Grace", "Hopper")?,
        },
        &DefaultClock,
    );

    let err = repo.create(&clash).await.expect_err("address collides");
    assert!(matches!(
        err,
        UserRepositoryError::DuplicateUser {
            field: UniqueField::Address,
            ..
        }
    ));

    let found = repo.find(first.address()).await?;
    assert_eq!(found.id(), first.id());
    assert_eq!(found.profile().first_name(), "Ada");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "starts or connects to a PostgreSQL server; run with --ignored"]
async fn duplicate_email_is_classified() -> eyre::Result<()> {
    let url = test_database_url().await?;
    let (_database, repo) = repository(&url).await?;
    let first = user_with_token(&unique_token())?;
    repo.create(&first).await?;

    let other = unique_token();
    let clash = User::new(
        NewUser {
            address: Address::new(format!("0x{other}"))?,
            user_name: UserName::new(format!("user_{other}"))?,
            email: first.email().clone(),
            profile: Profile::new("Grace", "Hopper")?,
        },
        &DefaultClock,
    );

    let err = repo.create(&clash).await.expect_err("email collides");
    assert!(matches!(
        err,
        UserRepositoryError::DuplicateUser {
            field: UniqueField::Email,
            ..
        }
    ));
    let missing = repo.find(clash.address()).await;
    assert!(matches!(missing, Err(UserRepositoryError::NotFound(_))));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "starts or connects to a PostgreSQL server; run with --ignored"]
async fn unknown_address_is_not_found() -> eyre::Result<()> {
    let url = test_database_url().await?;
    let (_database, repo) = repository(&url).await?;
    let address = Address::new(format!("0x{}", unique_token()))?;

    let result = repo.find(&address).await;

    assert!(matches!(result, Err(UserRepositoryError::NotFound(missing)) if missing == address));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "starts or connects to a PostgreSQL server; run with --ignored"]
async fn queries_after_disconnect_are_unavailable() -> eyre::Result<()> {
    let url = test_database_url().await?;
    let (database, repo) = repository(&url).await?;
    assert!(database.disconnect().await);

    let address = Address::new(format!("0x{}", unique_token()))?;
    let result = repo.find(&address).await;

    assert!(matches!(result, Err(UserRepositoryError::Unavailable(_))));
    Ok(())
}
