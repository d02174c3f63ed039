//! Client handlers.
//!
//! ```text
//! GET    /api/v1/workspaces/{id}/clients
//! POST   /api/v1/workspaces/{id}/clients {"data":{"fullName":"Ana Torres"}}
//! GET    /api/v1/clients/{id}
//! PUT    /api/v1/clients/{id} {"data":{"phone":null}}
//! DELETE /api/v1/clients/{id}
//! ```
//!
//! Clients in workspaces the caller does not own answer `404`.

use actix_web::{delete, get, post, put, web};

use crate::domain::{Client, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::envelope::{Deleted, Envelope};
use crate::inbound::http::records_dto::ClientBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_record_id, parse_workspace_id};

/// List a workspace's clients in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/clients",
    params(("id" = String, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Clients", body = Envelope<Vec<Client>>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Workspace not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "listClients"
)]
#[get("/workspaces/{id}/clients")]
pub async fn list_clients(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<Vec<Client>>>> {
    let workspace = parse_workspace_id(&path)?;
    let clients = state.clients.list(user.id(), &workspace).await?;
    Ok(web::Json(Envelope::new(clients)))
}

/// Create a client in a workspace.
#[utoipa::path(
    post,
    path = "/api/v1/workspaces/{id}/clients",
    params(("id" = String, Path, description = "Workspace id")),
    request_body = Envelope<ClientBody>,
    responses(
        (status = 200, description = "Created client", body = Envelope<Client>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Workspace not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "createClient"
)]
#[post("/workspaces/{id}/clients")]
pub async fn create_client(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<Envelope<ClientBody>>,
) -> ApiResult<web::Json<Envelope<Client>>> {
    let workspace = parse_workspace_id(&path)?;
    let draft = payload.data.to_draft()?;
    let client = state.clients.create(user.id(), &workspace, draft).await?;
    Ok(web::Json(Envelope::new(client)))
}

/// Fetch a client.
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client", body = Envelope<Client>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Client not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "getClient"
)]
#[get("/clients/{id}")]
pub async fn get_client(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<Client>>> {
    let id = parse_record_id(&path)?;
    let client = state.clients.get(user.id(), &id).await?;
    Ok(web::Json(Envelope::new(client)))
}

/// Update the named fields of a client.
#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    request_body = Envelope<ClientBody>,
    responses(
        (status = 200, description = "Updated client", body = Envelope<Client>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Client not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "updateClient"
)]
#[put("/clients/{id}")]
pub async fn update_client(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<Envelope<ClientBody>>,
) -> ApiResult<web::Json<Envelope<Client>>> {
    let id = parse_record_id(&path)?;
    let patch = payload.data.to_patch()?;
    let client = state.clients.update(user.id(), &id, patch).await?;
    Ok(web::Json(Envelope::new(client)))
}

/// Delete a client.
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "Deleted", body = Envelope<Deleted>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Client not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "deleteClient"
)]
#[delete("/clients/{id}")]
pub async fn delete_client(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<Deleted>>> {
    let id = parse_record_id(&path)?;
    state.clients.delete(user.id(), &id).await?;
    Ok(web::Json(Envelope::new(Deleted { id: id.to_string() })))
}
