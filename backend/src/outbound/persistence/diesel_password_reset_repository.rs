//! PostgreSQL-backed `PasswordResetRepository`.
//!
//! Codes are keyed by digest. Storing a new code for a user deletes any
//! earlier one in the same transaction; taking a code deletes and returns it
//! in one statement so concurrent redemptions cannot both succeed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    PasswordResetPersistenceError, PasswordResetRecord, PasswordResetRepository,
};
use crate::domain::{ResetCodeDigest, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPasswordResetRow, PasswordResetRow};
use super::pool::DbPool;
use super::schema::password_resets;

#[derive(Clone)]
pub struct DieselPasswordResetRepository {
    pool: DbPool,
}

impl DieselPasswordResetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_reset_diesel_error(error: diesel::result::Error) -> PasswordResetPersistenceError {
    map_diesel_error(
        error,
        PasswordResetPersistenceError::query,
        PasswordResetPersistenceError::connection,
    )
}

impl From<PasswordResetRow> for PasswordResetRecord {
    fn from(row: PasswordResetRow) -> Self {
        Self {
            digest: ResetCodeDigest::from_hex(row.digest),
            user_id: UserId::from_uuid(row.user_id),
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl PasswordResetRepository for DieselPasswordResetRepository {
    async fn store(&self, record: &PasswordResetRecord) -> Result<(), PasswordResetPersistenceError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PasswordResetPersistenceError::connection))?;
        let user_id = *record.user_id.as_uuid();
        let row = NewPasswordResetRow {
            digest: record.digest.as_str(),
            user_id,
            expires_at: record.expires_at,
        };

        conn.transaction(|conn| {
            async move {
                diesel::delete(password_resets::table.filter(password_resets::user_id.eq(user_id)))
                    .execute(conn)
                    .await?;
                diesel::insert_into(password_resets::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_reset_diesel_error)
    }

    async fn take(
        &self,
        digest: &ResetCodeDigest,
    ) -> Result<Option<PasswordResetRecord>, PasswordResetPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PasswordResetPersistenceError::connection))?;
        let row: Option<PasswordResetRow> = diesel::delete(
            password_resets::table.filter(password_resets::digest.eq(digest.as_str())),
        )
        .returning(PasswordResetRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_reset_diesel_error)?;
        Ok(row.map(PasswordResetRecord::from))
    }
}
