//! Generic service for workspace-scoped records.
//!
//! [`RecordService`] implements [`RecordCommand`] for any
//! [`WorkspaceRecord`], so clients and products share ownership checks and
//! error mapping.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    RecordCommand, RecordPersistenceError, RecordRepository, WorkspaceRepository,
};
use crate::domain::workspace_service::owned_workspace;
use crate::domain::{Error, RecordId, UserId, WorkspaceId, WorkspaceRecord};

/// Record service bound to one record type.
pub struct RecordService<R: WorkspaceRecord> {
    workspaces: Arc<dyn WorkspaceRepository>,
    records: Arc<dyn RecordRepository<R>>,
}

impl<R: WorkspaceRecord> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            workspaces: Arc::clone(&self.workspaces),
            records: Arc::clone(&self.records),
        }
    }
}

impl<R: WorkspaceRecord> RecordService<R> {
    pub fn new(workspaces: Arc<dyn WorkspaceRepository>, records: Arc<dyn RecordRepository<R>>) -> Self {
        Self { workspaces, records }
    }

    fn map_record_error(error: RecordPersistenceError) -> Error {
        let label = R::KIND.label();
        match error {
            RecordPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("{label} repository unavailable: {message}"))
            }
            RecordPersistenceError::Query { message } => {
                Error::internal(format!("{label} repository error: {message}"))
            }
        }
    }

    fn not_found() -> Error {
        Error::not_found(format!("{} not found", R::KIND.label()))
    }

    async fn owned_record(&self, user: &UserId, id: &RecordId) -> Result<R, Error> {
        let Some(record) = self
            .records
            .find_by_id(id)
            .await
            .map_err(Self::map_record_error)?
        else {
            return Err(Self::not_found());
        };
        owned_workspace(self.workspaces.as_ref(), user, record.workspace_id())
            .await
            .map_err(|err| match err.code() {
                crate::domain::ErrorCode::NotFound => Self::not_found(),
                _ => err,
            })?;
        Ok(record)
    }
}

#[async_trait]
impl<R: WorkspaceRecord> RecordCommand<R> for RecordService<R> {
    async fn list(&self, user: &UserId, workspace: &WorkspaceId) -> Result<Vec<R>, Error> {
        owned_workspace(self.workspaces.as_ref(), user, workspace).await?;
        self.records
            .list_by_workspace(workspace)
            .await
            .map_err(Self::map_record_error)
    }

    async fn create(&self, user: &UserId, workspace: &WorkspaceId, draft: R::Draft) -> Result<R, Error> {
        owned_workspace(self.workspaces.as_ref(), user, workspace).await?;
        let record = R::from_draft(RecordId::random(), *workspace, draft);
        self.records
            .insert(&record)
            .await
            .map_err(Self::map_record_error)?;
        info!(
            kind = R::KIND.label(),
            record_id = %record.id(),
            workspace_id = %workspace,
            "record created"
        );
        Ok(record)
    }

    async fn get(&self, user: &UserId, id: &RecordId) -> Result<R, Error> {
        self.owned_record(user, id).await
    }

    async fn update(&self, user: &UserId, id: &RecordId, patch: R::Patch) -> Result<R, Error> {
        let mut record = self.owned_record(user, id).await?;
        record.apply(patch);
        let stored = self
            .records
            .update(&record)
            .await
            .map_err(Self::map_record_error)?;
        if !stored {
            return Err(Self::not_found());
        }
        Ok(record)
    }

    async fn delete(&self, user: &UserId, id: &RecordId) -> Result<(), Error> {
        self.owned_record(user, id).await?;
        let removed = self
            .records
            .delete(id)
            .await
            .map_err(Self::map_record_error)?;
        if !removed {
            return Err(Self::not_found());
        }
        info!(kind = R::KIND.label(), record_id = %id, "record deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;
