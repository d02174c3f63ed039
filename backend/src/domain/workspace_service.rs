//! Workspace domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{WorkspaceCommand, WorkspacePersistenceError, WorkspaceRepository};
use crate::domain::{Error, UserId, Workspace, WorkspaceId, WorkspaceName};

pub(crate) fn map_workspace_error(error: WorkspacePersistenceError) -> Error {
    match error {
        WorkspacePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("workspace repository unavailable: {message}"))
        }
        WorkspacePersistenceError::Query { message } => {
            Error::internal(format!("workspace repository error: {message}"))
        }
    }
}

pub(crate) fn workspace_not_found() -> Error {
    Error::not_found("workspace not found")
}

/// Load `id` and confirm `user` owns it; foreign workspaces read as missing.
pub(crate) async fn owned_workspace(
    repo: &dyn WorkspaceRepository,
    user: &UserId,
    id: &WorkspaceId,
) -> Result<Workspace, Error> {
    match repo.find_by_id(id).await.map_err(map_workspace_error)? {
        Some(workspace) if workspace.is_owned_by(user) => Ok(workspace),
        _ => Err(workspace_not_found()),
    }
}

/// Workspace service implementing [`WorkspaceCommand`].
#[derive(Clone)]
pub struct WorkspaceService {
    repo: Arc<dyn WorkspaceRepository>,
    clock: Arc<dyn Clock>,
}

impl WorkspaceService {
    pub fn new(repo: Arc<dyn WorkspaceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl WorkspaceCommand for WorkspaceService {
    async fn list(&self, user: &UserId) -> Result<Vec<Workspace>, Error> {
        self.repo
            .list_by_owner(user)
            .await
            .map_err(map_workspace_error)
    }

    async fn create(&self, user: &UserId, name: WorkspaceName) -> Result<Workspace, Error> {
        let workspace = Workspace::create(*user, name, self.clock.utc());
        self.repo
            .insert(&workspace)
            .await
            .map_err(map_workspace_error)?;
        info!(workspace_id = %workspace.id(), owner_id = %user, "workspace created");
        Ok(workspace)
    }

    async fn get(&self, user: &UserId, id: &WorkspaceId) -> Result<Workspace, Error> {
        owned_workspace(self.repo.as_ref(), user, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockWorkspaceRepository;
    use mockable::DefaultClock;
    use rstest::rstest;

    fn service(repo: MockWorkspaceRepository) -> WorkspaceService {
        WorkspaceService::new(Arc::new(repo), Arc::new(DefaultClock))
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_owner_and_slug() {
        let mut repo = MockWorkspaceRepository::new();
        repo.expect_insert().times(1).return_once(|_| Ok(()));
        let owner = UserId::random();

        let workspace = service(repo)
            .create(&owner, WorkspaceName::new("My Shop").expect("name"))
            .await
            .expect("created");

        assert_eq!(workspace.owner_id(), &owner);
        assert_eq!(workspace.slug(), "my-shop");
    }

    #[rstest]
    #[tokio::test]
    async fn get_hides_foreign_workspaces() {
        let owner = UserId::random();
        let workspace = Workspace::create(owner, WorkspaceName::new("Theirs").expect("name"), chrono::Utc::now());
        let id = *workspace.id();
        let mut repo = MockWorkspaceRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(workspace)));

        let err = service(repo)
            .get(&UserId::random(), &id)
            .await
            .expect_err("foreign workspace");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_maps_outage_to_service_unavailable() {
        let mut repo = MockWorkspaceRepository::new();
        repo.expect_list_by_owner()
            .return_once(|_| Err(WorkspacePersistenceError::connection("refused")));

        let err = service(repo)
            .list(&UserId::random())
            .await
            .expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
