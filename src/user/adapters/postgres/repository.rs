//! `PostgreSQL` repository implementation for users and their profiles.

use super::{
    models::{NewProfileRow, NewUserRow, ProfileRow, UserRow},
    schema::{profiles, users},
};
use crate::database::Database;
use crate::user::{
    domain::{Address, Email, PersistedUserData, Profile, User, UserId, UserName},
    ports::{UniqueField, UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// A joined profile row that belongs to a different user.
#[derive(Debug, Error)]
#[error("profile of user {profile_user_id} joined to user {user_id}")]
struct MismatchedProfile {
    user_id: Uuid,
    profile_user_id: Uuid,
}

/// `PostgreSQL`-backed user repository.
///
/// The pool is borrowed from the shared [`Database`] on every call, so
/// queries issued after the connection was released fail with
/// [`UserRepositoryError::Unavailable`] instead of waiting for a connection.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    database: Arc<Database>,
}

impl PostgresUserRepository {
    /// Creates a repository on top of the shared connection lifecycle.
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self
            .database
            .pool()
            .map_err(UserRepositoryError::unavailable)?;
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> UserRepositoryResult<User> {
        let (new_user, new_profile) = to_new_rows(user);
        let candidate = user.clone();

        self.run_blocking(move |connection| {
            let (user_row, profile_row) = connection
                .transaction::<_, DieselError, _>(|tx| {
                    let user_row = diesel::insert_into(users::table)
                        .values(&new_user)
                        .returning(UserRow::as_returning())
                        .get_result(tx)?;
                    let profile_row = diesel::insert_into(profiles::table)
                        .values(&new_profile)
                        .returning(ProfileRow::as_returning())
                        .get_result(tx)?;
                    Ok((user_row, profile_row))
                })
                .map_err(|err| classify_insert_error(err, &candidate))?;
            rows_to_user(user_row, profile_row)
        })
        .await
    }

    async fn find(&self, address: &Address) -> UserRepositoryResult<User> {
        let wanted = address.clone();
        self.run_blocking(move |connection| {
            let row = users::table
                .inner_join(profiles::table)
                .filter(users::address.eq(wanted.as_str()))
                .select((UserRow::as_select(), ProfileRow::as_select()))
                .first::<(UserRow, ProfileRow)>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            let (user_row, profile_row) = row.ok_or(UserRepositoryError::NotFound(wanted))?;
            rows_to_user(user_row, profile_row)
        })
        .await
    }
}

fn to_new_rows(user: &User) -> (NewUserRow, NewProfileRow) {
    let id = user.id().into_inner();
    let user_row = NewUserRow {
        id,
        address: user.address().as_str().to_owned(),
        user_name: user.user_name().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        created_at: user.created_at(),
    };
    let profile_row = NewProfileRow {
        user_id: id,
        first_name: user.profile().first_name().to_owned(),
        last_name: user.profile().last_name().to_owned(),
    };
    (user_row, profile_row)
}

fn rows_to_user(user_row: UserRow, profile_row: ProfileRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        address,
        user_name,
        email,
        created_at,
    } = user_row;

    if profile_row.user_id != id {
        return Err(UserRepositoryError::invalid_persisted_data(
            MismatchedProfile {
                user_id: id,
                profile_user_id: profile_row.user_id,
            },
        ));
    }

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        address: Address::new(address).map_err(UserRepositoryError::invalid_persisted_data)?,
        user_name: UserName::new(user_name)
            .map_err(UserRepositoryError::invalid_persisted_data)?,
        email: Email::new(email).map_err(UserRepositoryError::invalid_persisted_data)?,
        created_at,
        profile: Profile::new(profile_row.first_name, profile_row.last_name)
            .map_err(UserRepositoryError::invalid_persisted_data)?,
    };
    Ok(User::from_persisted(data))
}

fn classify_insert_error(err: DieselError, candidate: &User) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
            match unique_field(info.as_ref()) {
                Some(UniqueField::Address) | None => UserRepositoryError::DuplicateUser {
                    field: UniqueField::Address,
                    value: candidate.address().to_string(),
                },
                Some(UniqueField::UserName) => UserRepositoryError::DuplicateUser {
                    field: UniqueField::UserName,
                    value: candidate.user_name().to_string(),
                },
                Some(UniqueField::Email) => UserRepositoryError::DuplicateUser {
                    field: UniqueField::Email,
                    value: candidate.email().to_string(),
                },
            }
        }
        _ => UserRepositoryError::persistence(err),
    }
}

/// Maps a violated constraint to the user field it guards.
///
/// Primary-key collisions on freshly generated ids are not expected, so an
/// unrecognised unique violation is reported against the address.
fn unique_field(info: &dyn DatabaseErrorInformation) -> Option<UniqueField> {
    match info.constraint_name()? {
        "idx_users_address" => Some(UniqueField::Address),
        "idx_users_user_name" => Some(UniqueField::UserName),
        "idx_users_email" => Some(UniqueField::Email),
        _ => None,
    }
}
