//! In-memory `WorkspaceRepository`.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{WorkspacePersistenceError, WorkspaceRepository};
use crate::domain::{UserId, Workspace, WorkspaceId};

use super::POISONED;

/// Workspaces held in creation order.
#[derive(Debug, Default)]
pub struct InMemoryWorkspaceRepository {
    workspaces: RwLock<Vec<Workspace>>,
}

impl InMemoryWorkspaceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkspaceRepository for InMemoryWorkspaceRepository {
    async fn insert(&self, workspace: &Workspace) -> Result<(), WorkspacePersistenceError> {
        self.workspaces
            .write()
            .map_err(|_| WorkspacePersistenceError::query(POISONED))?
            .push(workspace.clone());
        Ok(())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Workspace>, WorkspacePersistenceError> {
        let guard = self
            .workspaces
            .read()
            .map_err(|_| WorkspacePersistenceError::query(POISONED))?;
        Ok(guard
            .iter()
            .filter(|workspace| workspace.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>, WorkspacePersistenceError> {
        let guard = self
            .workspaces
            .read()
            .map_err(|_| WorkspacePersistenceError::query(POISONED))?;
        Ok(guard.iter().find(|workspace| workspace.id() == id).cloned())
    }
}
