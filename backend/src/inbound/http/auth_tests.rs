//! Handler tests for the authentication endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::domain::ports::MockAccountCommand;
use crate::domain::Error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::test_utils::{api_app, in_memory_state};

async fn post_json(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = actix_test::TestRequest::post().uri(uri).set_json(body);
    if let Some(token) = token {
        request = request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

fn detail_code(body: &Value) -> Option<&str> {
    body.get("details")?.get("code")?.as_str()
}

#[rstest]
#[actix_web::test]
async fn register_then_login_returns_token_and_user() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;

    let (status, registered) = post_json(
        &app,
        "/api/v1/auth/local/register",
        json!({"username": "alice", "email": "alice@example.com", "password": "alicepass123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(registered["jwt"].as_str().is_some_and(|jwt| !jwt.is_empty()));
    assert_eq!(registered["user"]["email"], "alice@example.com");

    let (status, session) = post_json(
        &app,
        "/api/v1/auth/local",
        json!({"identifier": "alice@example.com", "password": "alicepass123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"]["username"], "alice");
    assert_eq!(session["user"]["id"], registered["user"]["id"]);
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_unauthorised() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    post_json(
        &app,
        "/api/v1/auth/local/register",
        json!({"username": "alice", "email": "alice@example.com", "password": "alicepass123"}),
        None,
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/local",
        json!({"identifier": "alice", "password": "wrong-password"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(detail_code(&body), Some("invalid_credentials"));
}

#[rstest]
#[case(json!({"username": "", "email": "a@example.com", "password": "secret1"}), "username")]
#[case(json!({"username": "alice", "email": "nope", "password": "secret1"}), "email")]
#[case(json!({"username": "alice", "email": "a@example.com", "password": "short"}), "password")]
#[case(json!({"username": "a@example.com", "email": "a@example.com", "password": "secret1"}), "username")]
#[case(json!({"username": "alice", "email": format!("{}@example.com", "a".repeat(320)), "password": "secret1"}), "email")]
#[actix_web::test]
async fn register_validates_fields(#[case] body: Value, #[case] field: &str) {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let (status, body) = post_json(&app, "/api/v1/auth/local/register", body, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_reports_identity_taken() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let payload =
        json!({"username": "alice", "email": "alice@example.com", "password": "alicepass123"});
    post_json(&app, "/api/v1/auth/local/register", payload.clone(), None).await;

    let (status, body) = post_json(&app, "/api/v1/auth/local/register", payload, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail_code(&body), Some("identity_taken"));
}

#[rstest]
#[actix_web::test]
async fn usernames_cannot_shadow_another_users_email() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let (status, _) = post_json(
        &app,
        "/api/v1/auth/local/register",
        json!({"username": "bob", "email": "bob@example.com", "password": "bobpass123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/local/register",
        json!({"username": "bob@example.com", "email": "mallory@example.com", "password": "mallory123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "username");

    let (status, session) = post_json(
        &app,
        "/api/v1/auth/local",
        json!({"identifier": "bob@example.com", "password": "bobpass123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"]["username"], "bob");
}

#[rstest]
#[case("nobody@example.com")]
#[case("not-an-email")]
#[actix_web::test]
async fn forgot_password_always_acknowledges(#[case] email: &str) {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/forgot-password",
        json!({ "email": email }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[rstest]
#[actix_web::test]
async fn reset_with_unknown_code_is_rejected() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/reset-password",
        json!({"code": "abc", "password": "newpass123", "passwordConfirmation": "newpass123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail_code(&body), Some("invalid_or_expired_code"));
}

#[rstest]
#[actix_web::test]
async fn change_password_requires_bearer_token() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/change-password",
        json!({"currentPassword": "a", "password": "newpass123", "passwordConfirmation": "newpass123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn change_password_then_login_with_new_password() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let (_, registered) = post_json(
        &app,
        "/api/v1/auth/local/register",
        json!({"username": "alice", "email": "alice@example.com", "password": "alicepass123"}),
        None,
    )
    .await;
    let token = registered["jwt"].as_str().expect("jwt").to_owned();

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/change-password",
        json!({"currentPassword": "wrong", "password": "newpass123", "passwordConfirmation": "newpass123"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail_code(&body), Some("invalid_current_password"));

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/change-password",
        json!({"currentPassword": "alicepass123", "password": "newpass123", "passwordConfirmation": "other123"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail_code(&body), Some("password_mismatch"));

    let (status, _) = post_json(
        &app,
        "/api/v1/auth/change-password",
        json!({"currentPassword": "alicepass123", "password": "newpass123", "passwordConfirmation": "newpass123"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/api/v1/auth/local",
        json!({"identifier": "alice", "password": "newpass123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn current_user_resolves_the_bearer_token() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let (_, registered) = post_json(
        &app,
        "/api/v1/auth/local/register",
        json!({"username": "alice", "email": "alice@example.com", "password": "alicepass123"}),
        None,
    )
    .await;
    let token = registered["jwt"].as_str().expect("jwt");

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body, registered["user"]);
}

#[rstest]
#[actix_web::test]
async fn storage_outage_surfaces_as_service_unavailable() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_authenticate()
        .returning(|_| Err(Error::service_unavailable("user store unavailable")));
    let base = in_memory_state();
    let state = HttpState::new(
        Arc::new(accounts),
        base.workspaces,
        base.clients,
        base.products,
    );
    let app = actix_test::init_service(api_app(state)).await;

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/local",
        json!({"identifier": "alice", "password": "alicepass123"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/local")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
