//! Workspaces: the tenant boundary owning clients and products.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::slug::derive_slug;
use super::{UserId, WorkspaceId};

/// Maximum workspace name length, in characters.
pub const WORKSPACE_NAME_MAX: usize = 120;

/// Validation errors for workspace input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceValidationError {
    #[error("workspace name must not be empty")]
    EmptyName,
    #[error("workspace name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Trimmed, non-empty workspace display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceName(String);

impl WorkspaceName {
    /// Validate and construct a workspace name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, WorkspaceValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WorkspaceValidationError::EmptyName);
        }
        if trimmed.chars().count() > WORKSPACE_NAME_MAX {
            return Err(WorkspaceValidationError::NameTooLong {
                max: WORKSPACE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Slug derived from this name.
    pub fn slug(&self) -> String {
        derive_slug(&self.0)
    }
}

impl AsRef<str> for WorkspaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<WorkspaceName> for String {
    fn from(value: WorkspaceName) -> Self {
        value.0
    }
}

impl TryFrom<String> for WorkspaceName {
    type Error = WorkspaceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A tenant workspace.
///
/// ## Invariants
/// - `slug` is derived from `name` at creation and never edited directly.
/// - `owner` never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    id: WorkspaceId,
    #[schema(value_type = String, example = "My Shop")]
    name: WorkspaceName,
    #[schema(example = "my-shop")]
    slug: String,
    #[schema(value_type = String)]
    owner_id: UserId,
    created_at: DateTime<Utc>,
}

impl Workspace {
    /// Create a new workspace owned by `owner`, deriving its slug.
    pub fn create(owner: UserId, name: WorkspaceName, created_at: DateTime<Utc>) -> Self {
        let slug = name.slug();
        Self {
            id: WorkspaceId::random(),
            name,
            slug,
            owner_id: owner,
            created_at,
        }
    }

    /// Rehydrate a stored workspace.
    pub fn from_parts(
        id: WorkspaceId,
        name: WorkspaceName,
        slug: String,
        owner_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            owner_id,
            created_at,
        }
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    pub fn name(&self) -> &WorkspaceName {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `user` owns this workspace.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }
}
