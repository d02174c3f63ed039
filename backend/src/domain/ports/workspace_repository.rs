//! Port abstraction for workspace persistence.
use async_trait::async_trait;

use crate::domain::{UserId, Workspace, WorkspaceId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by workspace repository adapters.
    pub enum WorkspacePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "workspace repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "workspace repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Persist a newly created workspace.
    async fn insert(&self, workspace: &Workspace) -> Result<(), WorkspacePersistenceError>;

    /// Workspaces owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Workspace>, WorkspacePersistenceError>;

    /// Fetch a workspace regardless of owner.
    async fn find_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>, WorkspacePersistenceError>;
}
