//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, User, UserAccount, UserId, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation_constraint};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed account store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_one(
        &self,
        query: users::BoxedQuery<'static, diesel::pg::Pg>,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row: Option<UserRow> = query
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;
        row.map(row_to_account).transpose()
    }
}

fn map_user_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    if let Some(constraint) = unique_violation_constraint(&error) {
        let field = if constraint.contains("email") {
            "email"
        } else {
            "username"
        };
        return UserPersistenceError::duplicate(field);
    }
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let corrupt = |err: crate::domain::UserValidationError| {
        warn!(user_id = %row.id, error = %err, "stored user row failed validation");
        UserPersistenceError::query("stored user row is invalid")
    };
    let username = Username::new(&row.username).map_err(corrupt)?;
    let email = EmailAddress::new(&row.email).map_err(corrupt)?;
    Ok(UserAccount {
        user: User::new(UserId::from_uuid(row.id), username, email),
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row = NewUserRow {
            id: *account.user.id().as_uuid(),
            username: account.user.username().as_ref(),
            email: account.user.email().as_ref(),
            password_hash: account.password_hash.as_str(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_user_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        self.fetch_one(users::table.filter(users::id.eq(*id.as_uuid())).into_boxed())
            .await
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let by_username = self
            .fetch_one(
                users::table
                    .filter(users::username.eq(identifier.to_owned()))
                    .into_boxed(),
            )
            .await?;
        if by_username.is_some() {
            return Ok(by_username);
        }
        self.fetch_one(
            users::table
                .filter(users::email.eq(identifier.to_lowercase()))
                .into_boxed(),
        )
            .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        self.fetch_one(
            users::table
                .filter(users::email.eq(email.as_ref().to_owned()))
                .into_boxed(),
        )
            .await
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let updated = diesel::update(users::table.filter(users::id.eq(*id.as_uuid())))
            .set((
                users::password_hash.eq(hash.as_str()),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;
        Ok(updated > 0)
    }
}
