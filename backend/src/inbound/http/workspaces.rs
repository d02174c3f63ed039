//! Workspace handlers.
//!
//! ```text
//! GET  /api/v1/workspaces
//! POST /api/v1/workspaces {"data":{"name":"Acme"}}
//! GET  /api/v1/workspaces/{id}
//! ```
//!
//! Workspaces are always owned by the caller; an `owner` field in the body is
//! ignored.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Workspace, WorkspaceName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_workspace_id, require};

/// Workspace creation fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRequest {
    #[schema(example = "My Team")]
    pub name: Option<String>,
}

/// List the caller's workspaces in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/workspaces",
    responses(
        (status = 200, description = "Owned workspaces", body = Envelope<Vec<Workspace>>),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "listWorkspaces"
)]
#[get("/workspaces")]
pub async fn list_workspaces(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Envelope<Vec<Workspace>>>> {
    let workspaces = state.workspaces.list(user.id()).await?;
    Ok(web::Json(Envelope::new(workspaces)))
}

/// Create a workspace owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/workspaces",
    request_body = Envelope<WorkspaceRequest>,
    responses(
        (status = 200, description = "Created workspace", body = Envelope<Workspace>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "createWorkspace"
)]
#[post("/workspaces")]
pub async fn create_workspace(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<Envelope<WorkspaceRequest>>,
) -> ApiResult<web::Json<Envelope<Workspace>>> {
    let request = payload.into_inner().into_inner();
    let name = require(request.name, FieldName::new("name"))?;
    let name = WorkspaceName::new(name)?;
    let workspace = state.workspaces.create(user.id(), name).await?;
    Ok(web::Json(Envelope::new(workspace)))
}

/// Fetch one of the caller's workspaces.
#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}",
    params(("id" = String, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Workspace", body = Envelope<Workspace>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found or not owned", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "getWorkspace"
)]
#[get("/workspaces/{id}")]
pub async fn get_workspace(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<Workspace>>> {
    let id = parse_workspace_id(&path)?;
    let workspace = state.workspaces.get(user.id(), &id).await?;
    Ok(web::Json(Envelope::new(workspace)))
}

#[cfg(test)]
#[path = "workspaces_tests.rs"]
mod tests;
