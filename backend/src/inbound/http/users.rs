//! Current-user handler.
//!
//! ```text
//! GET /api/v1/users/me
//! ```

use actix_web::{get, web};

use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Return the account behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<User>> {
    let user = state.accounts.current_user(user.id()).await?;
    Ok(web::Json(user))
}
