//! Product handlers.
//!
//! ```text
//! GET    /api/v1/workspaces/{id}/products
//! POST   /api/v1/workspaces/{id}/products {"data":{"name":"Espresso beans","regularPrice":24.5}}
//! GET    /api/v1/products/{id}
//! PUT    /api/v1/products/{id} {"data":{"salePrice":null}}
//! DELETE /api/v1/products/{id}
//! ```
//!
//! Products in workspaces the caller does not own answer `404`.

use actix_web::{delete, get, post, put, web};

use crate::domain::{Product, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::envelope::{Deleted, Envelope};
use crate::inbound::http::records_dto::ProductBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_record_id, parse_workspace_id};

/// List a workspace's products in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/products",
    params(("id" = String, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Products", body = Envelope<Vec<Product>>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Workspace not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/workspaces/{id}/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<Vec<Product>>>> {
    let workspace = parse_workspace_id(&path)?;
    let products = state.products.list(user.id(), &workspace).await?;
    Ok(web::Json(Envelope::new(products)))
}

/// Create a product in a workspace.
#[utoipa::path(
    post,
    path = "/api/v1/workspaces/{id}/products",
    params(("id" = String, Path, description = "Workspace id")),
    request_body = Envelope<ProductBody>,
    responses(
        (status = 200, description = "Created product", body = Envelope<Product>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Workspace not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/workspaces/{id}/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<Envelope<ProductBody>>,
) -> ApiResult<web::Json<Envelope<Product>>> {
    let workspace = parse_workspace_id(&path)?;
    let draft = payload.data.to_draft()?;
    let product = state.products.create(user.id(), &workspace, draft).await?;
    Ok(web::Json(Envelope::new(product)))
}

/// Fetch a product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Envelope<Product>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<Product>>> {
    let id = parse_record_id(&path)?;
    let product = state.products.get(user.id(), &id).await?;
    Ok(web::Json(Envelope::new(product)))
}

/// Update the named fields of a product.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = Envelope<ProductBody>,
    responses(
        (status = 200, description = "Updated product", body = Envelope<Product>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<Envelope<ProductBody>>,
) -> ApiResult<web::Json<Envelope<Product>>> {
    let id = parse_record_id(&path)?;
    let patch = payload.data.to_patch()?;
    let product = state.products.update(user.id(), &id, patch).await?;
    Ok(web::Json(Envelope::new(product)))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted", body = Envelope<Deleted>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<Deleted>>> {
    let id = parse_record_id(&path)?;
    state.products.delete(user.id(), &id).await?;
    Ok(web::Json(Envelope::new(Deleted { id: id.to_string() })))
}
