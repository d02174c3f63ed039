//! PostgreSQL-backed `RecordRepository<Client>`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{RecordPersistenceError, RecordRepository};
use crate::domain::{Client, ClientKind, EmailAddress, RecordId, WorkspaceId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::ClientRow;
use super::pool::DbPool;
use super::schema::clients;

/// Diesel-backed client store. Listings follow insertion order.
#[derive(Clone)]
pub struct DieselClientRepository {
    pool: DbPool,
}

impl DieselClientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(super) fn map_record_diesel_error(error: diesel::result::Error) -> RecordPersistenceError {
    map_diesel_error(
        error,
        RecordPersistenceError::query,
        RecordPersistenceError::connection,
    )
}

impl From<&Client> for ClientRow {
    fn from(client: &Client) -> Self {
        Self {
            id: *client.id.as_uuid(),
            workspace_id: *client.workspace_id.as_uuid(),
            full_name: client.full_name.clone(),
            phone: client.phone.clone(),
            email: client.email.as_ref().map(|email| email.as_ref().to_owned()),
            date_of_birth: client.date_of_birth,
            country: client.country.clone(),
            kind: client.kind.as_str().to_owned(),
            document_type: client.document_type.clone(),
            document_number: client.document_number.clone(),
        }
    }
}

fn row_to_client(row: ClientRow) -> Result<Client, RecordPersistenceError> {
    let invalid = |reason: &str| {
        warn!(client_id = %row.id, reason, "stored client row failed validation");
        RecordPersistenceError::query("stored client row is invalid")
    };
    let kind = ClientKind::parse(&row.kind).ok_or_else(|| invalid("unknown kind"))?;
    let email = row
        .email
        .as_deref()
        .map(EmailAddress::new)
        .transpose()
        .map_err(|_| invalid("malformed email"))?;
    Ok(Client {
        id: RecordId::from_uuid(row.id),
        workspace_id: WorkspaceId::from_uuid(row.workspace_id),
        full_name: row.full_name,
        phone: row.phone,
        email,
        date_of_birth: row.date_of_birth,
        country: row.country,
        kind,
        document_type: row.document_type,
        document_number: row.document_number,
    })
}

#[async_trait]
impl RecordRepository<Client> for DieselClientRepository {
    async fn insert(&self, record: &Client) -> Result<(), RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        diesel::insert_into(clients::table)
            .values(ClientRow::from(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_record_diesel_error)
    }

    async fn list_by_workspace(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<Client>, RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        let rows: Vec<ClientRow> = clients::table
            .filter(clients::workspace_id.eq(*workspace.as_uuid()))
            .order(clients::seq.asc())
            .select(ClientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_record_diesel_error)?;
        rows.into_iter().map(row_to_client).collect()
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Client>, RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        let row: Option<ClientRow> = clients::table
            .filter(clients::id.eq(*id.as_uuid()))
            .select(ClientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_record_diesel_error)?;
        row.map(row_to_client).transpose()
    }

    async fn update(&self, record: &Client) -> Result<bool, RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        let row = ClientRow::from(record);
        let updated = diesel::update(clients::table.filter(clients::id.eq(row.id)))
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(map_record_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        let deleted = diesel::delete(clients::table.filter(clients::id.eq(*id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_record_diesel_error)?;
        Ok(deleted > 0)
    }
}
