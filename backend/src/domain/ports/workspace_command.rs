//! Driving port for workspace use-cases.

use async_trait::async_trait;

use crate::domain::{Error, UserId, Workspace, WorkspaceId, WorkspaceName};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceCommand: Send + Sync {
    /// Workspaces owned by `user`, oldest first.
    async fn list(&self, user: &UserId) -> Result<Vec<Workspace>, Error>;

    /// Create a workspace owned by `user`.
    async fn create(&self, user: &UserId, name: WorkspaceName) -> Result<Workspace, Error>;

    /// Fetch one workspace owned by `user`.
    ///
    /// # Errors
    /// `not_found` when the workspace is missing or owned by someone else.
    async fn get(&self, user: &UserId, id: &WorkspaceId) -> Result<Workspace, Error>;
}
