//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod auth;
pub mod bearer;
pub mod clients;
pub mod envelope;
pub mod error;
pub mod health;
pub mod products;
pub mod records_dto;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod token_key;
pub mod users;
pub mod validation;
pub mod workspaces;

pub use error::ApiResult;

use actix_web::{error::JsonPayloadError, web};
use tracing::debug;

use crate::domain::Error;

/// JSON extractor settings mapping malformed bodies to `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        debug!(error = %err, "rejected malformed JSON body");
        Error::invalid_request(format!("malformed request body: {err}")).into()
    })
}

/// Register every `/api/v1` handler on a service config.
///
/// Shared by the server and the handler tests so both see the same routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api/v1")
            .service(auth::login)
            .service(auth::register)
            .service(auth::forgot_password)
            .service(auth::reset_password)
            .service(auth::change_password)
            .service(users::current_user)
            .service(workspaces::list_workspaces)
            .service(workspaces::create_workspace)
            .service(workspaces::get_workspace)
            .service(clients::list_clients)
            .service(clients::create_client)
            .service(clients::get_client)
            .service(clients::update_client)
            .service(clients::delete_client)
            .service(products::list_products)
            .service(products::create_product)
            .service(products::get_product)
            .service(products::update_product)
            .service(products::delete_product),
    );
}
