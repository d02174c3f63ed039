//! Driving port for client and product use-cases.
//!
//! Every operation is scoped to the calling user. Records in workspaces the
//! caller does not own are reported as `not_found`, never as forbidden, so
//! callers cannot discover other tenants' data.

use async_trait::async_trait;

use crate::domain::{Error, RecordId, UserId, WorkspaceId, WorkspaceRecord};

#[async_trait]
pub trait RecordCommand<R: WorkspaceRecord>: Send + Sync {
    /// Records in `workspace`, in insertion order.
    async fn list(&self, user: &UserId, workspace: &WorkspaceId) -> Result<Vec<R>, Error>;

    /// Create a record in `workspace`.
    async fn create(&self, user: &UserId, workspace: &WorkspaceId, draft: R::Draft) -> Result<R, Error>;

    /// Fetch one record.
    async fn get(&self, user: &UserId, id: &RecordId) -> Result<R, Error>;

    /// Apply a partial update and return the stored result.
    async fn update(&self, user: &UserId, id: &RecordId, patch: R::Patch) -> Result<R, Error>;

    /// Delete a record.
    async fn delete(&self, user: &UserId, id: &RecordId) -> Result<(), Error>;
}
