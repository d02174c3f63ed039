//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] registers every `/api/v1` handler plus the health probes, the
//! domain schemas they exchange and the bearer token security scheme. Swagger
//! UI serves it in debug builds and `openapi-dump` prints it for tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AuthSession, Client, ClientKind, Error, ErrorCode, Product, User, Workspace};
use crate::inbound::http::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    RegisterRequest, ResetPasswordRequest,
};
use crate::inbound::http::envelope::Deleted;
use crate::inbound::http::records_dto::{ClientBody, ProductBody};
use crate::inbound::http::workspaces::WorkspaceRequest;

/// Name of the security scheme applied to authenticated operations.
pub const BEARER_SCHEME: &str = "BearerToken";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/v1/auth/local or /auth/local/register.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Workbench backend API",
        description = "Accounts, workspaces and the clients and products they own."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::forgot_password,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::auth::change_password,
        crate::inbound::http::users::current_user,
        crate::inbound::http::workspaces::list_workspaces,
        crate::inbound::http::workspaces::create_workspace,
        crate::inbound::http::workspaces::get_workspace,
        crate::inbound::http::clients::list_clients,
        crate::inbound::http::clients::create_client,
        crate::inbound::http::clients::get_client,
        crate::inbound::http::clients::update_client,
        crate::inbound::http::clients::delete_client,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        AuthSession,
        Workspace,
        Client,
        ClientKind,
        Product,
        Deleted,
        WorkspaceRequest,
        ClientBody,
        ProductBody,
        LoginRequest,
        RegisterRequest,
        ForgotPasswordRequest,
        ForgotPasswordResponse,
        ResetPasswordRequest,
        ChangePasswordRequest,
    )),
    tags(
        (name = "auth", description = "Sign-in, registration and password management"),
        (name = "users", description = "The signed-in user"),
        (name = "workspaces", description = "Tenant workspaces"),
        (name = "clients", description = "Clients owned by a workspace"),
        (name = "products", description = "Products owned by a workspace"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
