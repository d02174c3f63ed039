//! Port abstraction for workspace-scoped record persistence.
//!
//! One trait serves clients and products; adapters implement it once per
//! concrete [`WorkspaceRecord`].
use async_trait::async_trait;

use crate::domain::{RecordId, WorkspaceId, WorkspaceRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by record repository adapters.
    pub enum RecordPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record repository query failed: {message}",
    }
}

#[async_trait]
pub trait RecordRepository<R: WorkspaceRecord>: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: &R) -> Result<(), RecordPersistenceError>;

    /// Records belonging to `workspace`, in insertion order.
    async fn list_by_workspace(&self, workspace: &WorkspaceId) -> Result<Vec<R>, RecordPersistenceError>;

    /// Fetch a record regardless of workspace.
    async fn find_by_id(&self, id: &RecordId) -> Result<Option<R>, RecordPersistenceError>;

    /// Overwrite a stored record; returns `false` when it no longer exists.
    async fn update(&self, record: &R) -> Result<bool, RecordPersistenceError>;

    /// Delete a record; returns `false` when it did not exist.
    async fn delete(&self, id: &RecordId) -> Result<bool, RecordPersistenceError>;
}
