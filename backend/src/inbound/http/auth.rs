//! Authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/local {"identifier":"ada","password":"secret"}
//! POST /api/v1/auth/local/register {"username":"ada","email":"ada@example.com","password":"secret"}
//! POST /api/v1/auth/forgot-password {"email":"ada@example.com"}
//! POST /api/v1/auth/reset-password {"code":"...","password":"...","passwordConfirmation":"..."}
//! POST /api/v1/auth/change-password {"currentPassword":"...","password":"...","passwordConfirmation":"..."}
//! ```
//!
//! Successful calls answer `{"jwt": "...", "user": {...}}`.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, PasswordChange, PasswordResetCompletion,
    Registration,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/auth/local`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email address.
    #[schema(example = "ada")]
    pub identifier: String,
    pub password: String,
}

/// Body for `POST /api/v1/auth/local/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Body for `POST /api/v1/auth/forgot-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Acknowledgement returned whether or not the email is registered.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ForgotPasswordResponse {
    pub ok: bool,
}

/// Body for `POST /api/v1/auth/reset-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub code: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Body for `POST /api/v1/auth/change-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Sign in with a username or email.
#[utoipa::path(
    post,
    path = "/api/v1/auth/local",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/local")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let LoginRequest {
        identifier,
        password,
    } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&identifier, &password)?;
    let session = state.accounts.authenticate(&credentials).await?;
    Ok(web::Json(session))
}

/// Create an account and sign in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/local/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = AuthSession),
        (status = 400, description = "Invalid request or identity taken", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/local/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&username, &email, &password)?;
    let session = state.accounts.register(registration).await?;
    Ok(web::Json(session))
}

/// Ask for a password reset code.
///
/// The answer never reveals whether the address is registered; malformed
/// addresses are acknowledged the same way.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Request accepted", body = ForgotPasswordResponse),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<web::Json<ForgotPasswordResponse>> {
    match EmailAddress::new(&payload.email) {
        Ok(email) => state.accounts.request_password_reset(&email).await?,
        Err(err) => debug!(error = %err, "ignoring reset request for malformed email"),
    }
    Ok(web::Json(ForgotPasswordResponse { ok: true }))
}

/// Redeem a reset code and set a new password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = AuthSession),
        (status = 400, description = "Invalid or expired code", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let ResetPasswordRequest {
        code,
        password,
        password_confirmation,
    } = payload.into_inner();
    let completion =
        PasswordResetCompletion::try_from_parts(&code, &password, &password_confirmation)?;
    let session = state.accounts.complete_password_reset(completion).await?;
    Ok(web::Json(session))
}

/// Change the signed-in user's password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AuthSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "changePassword"
)]
#[post("/auth/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let ChangePasswordRequest {
        current_password,
        password,
        password_confirmation,
    } = payload.into_inner();
    let change =
        PasswordChange::try_from_parts(&current_password, &password, &password_confirmation)?;
    let session = state.accounts.change_password(user.id(), change).await?;
    Ok(web::Json(session))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
