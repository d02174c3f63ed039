//! PostgreSQL-backed `WorkspaceRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{WorkspacePersistenceError, WorkspaceRepository};
use crate::domain::{UserId, Workspace, WorkspaceId, WorkspaceName};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::WorkspaceRow;
use super::pool::DbPool;
use super::schema::workspaces;

/// Diesel-backed workspace store.
#[derive(Clone)]
pub struct DieselWorkspaceRepository {
    pool: DbPool,
}

impl DieselWorkspaceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_workspace_diesel_error(error: diesel::result::Error) -> WorkspacePersistenceError {
    map_diesel_error(
        error,
        WorkspacePersistenceError::query,
        WorkspacePersistenceError::connection,
    )
}

fn row_to_workspace(row: WorkspaceRow) -> Result<Workspace, WorkspacePersistenceError> {
    let name = WorkspaceName::new(&row.name).map_err(|err| {
        warn!(workspace_id = %row.id, error = %err, "stored workspace row failed validation");
        WorkspacePersistenceError::query("stored workspace row is invalid")
    })?;
    Ok(Workspace::from_parts(
        WorkspaceId::from_uuid(row.id),
        name,
        row.slug,
        UserId::from_uuid(row.owner_id),
        row.created_at,
    ))
}

impl From<&Workspace> for WorkspaceRow {
    fn from(workspace: &Workspace) -> Self {
        Self {
            id: *workspace.id().as_uuid(),
            name: workspace.name().as_ref().to_owned(),
            slug: workspace.slug().to_owned(),
            owner_id: *workspace.owner_id().as_uuid(),
            created_at: workspace.created_at(),
        }
    }
}

#[async_trait]
impl WorkspaceRepository for DieselWorkspaceRepository {
    async fn insert(&self, workspace: &Workspace) -> Result<(), WorkspacePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkspacePersistenceError::connection))?;
        diesel::insert_into(workspaces::table)
            .values(WorkspaceRow::from(workspace))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_workspace_diesel_error)
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Workspace>, WorkspacePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkspacePersistenceError::connection))?;
        let rows: Vec<WorkspaceRow> = workspaces::table
            .filter(workspaces::owner_id.eq(*owner.as_uuid()))
            .order((workspaces::created_at.asc(), workspaces::id.asc()))
            .select(WorkspaceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_workspace_diesel_error)?;
        rows.into_iter().map(row_to_workspace).collect()
    }

    async fn find_by_id(
        &self,
        id: &WorkspaceId,
    ) -> Result<Option<Workspace>, WorkspacePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, WorkspacePersistenceError::connection))?;
        let row: Option<WorkspaceRow> = workspaces::table
            .filter(workspaces::id.eq(*id.as_uuid()))
            .select(WorkspaceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_workspace_diesel_error)?;
        row.map(row_to_workspace).transpose()
    }
}
