//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Email uniqueness rides on the table's unique constraint: a duplicate
//! insert or update fails atomically inside the statement's own transaction
//! and surfaces as `DuplicateEmail` without touching storage.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    EmailAddress, NewUser, PasswordSecret, User, UserId, UserName, UserUpdate,
};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user repository errors.
fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user repository errors.
///
/// The unique-violation case needs the attempted email for context, so it is
/// handled by the callers that can race on the constraint.
fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRepositoryError::connection("database connection error")
        }
        _ => UserRepositoryError::query("database error"),
    }
}

fn is_unique_violation(error: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Convert a database row to a domain [`User`].
///
/// Stored values already passed validation at write time; a record that no
/// longer does indicates out-of-band tampering and is reported as a query
/// failure rather than a panic.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let name = UserName::new(row.name).map_err(|err| {
        warn!(user_id = row.id, error = %err, "stored user name is invalid");
        UserRepositoryError::query("stored user record is invalid")
    })?;
    let email = EmailAddress::new(row.email).map_err(|err| {
        warn!(user_id = row.id, error = %err, "stored user email is invalid");
        UserRepositoryError::query("stored user record is invalid")
    })?;

    Ok(User::new(
        UserId::new(row.id),
        name,
        email,
        PasswordSecret::new(row.password_secret),
        row.admin_status,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            name: new_user.name.as_ref(),
            email: new_user.email.as_ref(),
            password_secret: new_user.secret.as_str(),
            admin_status: false,
        };

        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserRepositoryError::duplicate_email(new_user.email.as_ref())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_user(inserted)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(id.as_i32())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        if update.is_empty() {
            let row = users::table
                .find(id.as_i32())
                .select(UserRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
            return row
                .ok_or_else(|| UserRepositoryError::not_found(id))
                .and_then(row_to_user);
        }

        let changeset = UserChangeset {
            email: update.email.as_ref().map(AsRef::as_ref),
            password_secret: update.secret.as_ref().map(PasswordSecret::as_str),
            admin_status: update.admin_status,
        };

        let updated: UserRow = diesel::update(users::table.find(id.as_i32()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    let email = update
                        .email
                        .as_ref()
                        .map(AsRef::as_ref)
                        .unwrap_or_default();
                    UserRepositoryError::duplicate_email(email)
                } else if matches!(err, diesel::result::Error::NotFound) {
                    UserRepositoryError::not_found(id)
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_user(updated)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(users::table.find(id.as_i32()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if removed == 0 {
            return Err(UserRepositoryError::not_found(id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Mapping coverage; query execution is exercised against a live
    //! database only.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn row(name: &str, email: &str) -> UserRow {
        UserRow {
            id: 1,
            name: name.to_owned(),
            email: email.to_owned(),
            password_secret: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            admin_status: false,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_rows_convert_to_domain_users() {
        let user = row_to_user(row("Alice", "alice@example.com")).expect("row converts");
        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.email().as_ref(), "alice@example.com");
        assert!(!user.admin_status());
    }

    #[rstest]
    #[case("", "alice@example.com")]
    #[case("Alice", "not-an-email")]
    fn corrupted_rows_surface_as_query_errors(#[case] name: &str, #[case] email: &str) {
        let err = row_to_user(row(name, email)).expect_err("corrupt row must fail");
        assert_eq!(
            err,
            UserRepositoryError::query("stored user record is invalid")
        );
    }

    #[rstest]
    fn pool_errors_map_to_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn generic_diesel_errors_map_to_query_failures() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(err, UserRepositoryError::query("database error"));
    }
}
