//! Handler tests for workspaces and the workspace-scoped record endpoints.

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{api_app, in_memory_state};

async fn call(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = actix_test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    if let Some(body) = body {
        request = request.set_json(body);
    }
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> String {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/local/register")
        .set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    body["jwt"].as_str().expect("jwt issued").to_owned()
}

async fn create_workspace(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    token: &str,
    name: &str,
) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/workspaces",
        token,
        Some(json!({ "data": { "name": name } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"].clone()
}

#[rstest]
#[case("Acme", "acme")]
#[case("My Team", "my-team")]
#[actix_web::test]
async fn workspace_slugs_are_derived_from_names(#[case] name: &str, #[case] slug: &str) {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let token = register(&app, "alice").await;

    let workspace = create_workspace(&app, &token, name).await;
    assert_eq!(workspace["name"], name);
    assert_eq!(workspace["slug"], slug);
}

#[rstest]
#[actix_web::test]
async fn blank_workspace_name_is_rejected() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let token = register(&app, "alice").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/workspaces",
        &token,
        Some(json!({ "data": { "name": "   " } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "name");
}

#[rstest]
#[actix_web::test]
async fn users_only_see_their_own_workspaces() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let acme = create_workspace(&app, &alice, "Acme").await;
    create_workspace(&app, &bob, "Bobco").await;

    let (_, listed) = call(&app, Method::GET, "/api/v1/workspaces", &alice, None).await;
    let names: Vec<&str> = listed["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|ws| ws["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Acme"]);

    let uri = format!("/api/v1/workspaces/{}", acme["id"].as_str().expect("id"));
    let (status, body) = call(&app, Method::GET, &uri, &bob, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn records_in_foreign_workspaces_are_not_found() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let alice = register(&app, "alice").await;
    let mallory = register(&app, "mallory").await;
    let acme = create_workspace(&app, &alice, "Acme").await;
    let ws_id = acme["id"].as_str().expect("id");

    let clients_uri = format!("/api/v1/workspaces/{ws_id}/clients");
    let (status, created) = call(
        &app,
        Method::POST,
        &clients_uri,
        &alice,
        Some(json!({ "data": { "fullName": "Ana Torres" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let client_id = created["data"]["id"].as_str().expect("client id").to_owned();

    let (status, _) = call(
        &app,
        Method::POST,
        &clients_uri,
        &mallory,
        Some(json!({ "data": { "fullName": "Injected" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::GET, &clients_uri, &mallory, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let record_uri = format!("/api/v1/clients/{client_id}");
    for method in [Method::GET, Method::DELETE] {
        let (status, _) = call(&app, method, &record_uri, &mallory, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let (status, _) = call(
        &app,
        Method::PUT,
        &record_uri,
        &mallory,
        Some(json!({ "data": { "fullName": "Hijacked" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = call(&app, Method::GET, &clients_uri, &alice, None).await;
    assert_eq!(listed["data"][0]["fullName"], "Ana Torres");
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn client_lifecycle_applies_partial_updates() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let token = register(&app, "alice").await;
    let ws = create_workspace(&app, &token, "Acme").await;
    let clients_uri = format!("/api/v1/workspaces/{}/clients", ws["id"].as_str().expect("id"));

    let (_, created) = call(
        &app,
        Method::POST,
        &clients_uri,
        &token,
        Some(json!({ "data": {
            "fullName": "Ana Torres",
            "phone": "+34 600 000 000",
            "dateOfBirth": "1990-04-12",
            "kind": "supplier",
        }})),
    )
    .await;
    let client = &created["data"];
    assert_eq!(client["documentType"], "DNI");
    assert_eq!(client["kind"], "supplier");
    assert_eq!(client["workspaceId"], ws["id"]);

    let record_uri = format!("/api/v1/clients/{}", client["id"].as_str().expect("id"));
    let (status, updated) = call(
        &app,
        Method::PUT,
        &record_uri,
        &token,
        Some(json!({ "data": { "country": "ES", "phone": null } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["country"], "ES");
    assert_eq!(updated["data"]["phone"], Value::Null);
    assert_eq!(updated["data"]["fullName"], "Ana Torres");
    assert_eq!(updated["data"]["dateOfBirth"], "1990-04-12");

    let (status, _) = call(&app, Method::DELETE, &record_uri, &token, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, &record_uri, &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, listed) = call(&app, Method::GET, &clients_uri, &token, None).await;
    assert_eq!(listed["data"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn non_numeric_document_numbers_are_rejected() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let token = register(&app, "alice").await;
    let ws = create_workspace(&app, &token, "Acme").await;
    let clients_uri = format!("/api/v1/workspaces/{}/clients", ws["id"].as_str().expect("id"));

    let (status, body) = call(
        &app,
        Method::POST,
        &clients_uri,
        &token,
        Some(json!({ "data": { "fullName": "Ana", "documentNumber": "not-a-number" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "documentNumber");
    assert_eq!(body["details"]["code"], "invalid_document_number");

    let (_, listed) = call(&app, Method::GET, &clients_uri, &token, None).await;
    assert_eq!(listed["data"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn products_validate_and_list_in_insertion_order() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let token = register(&app, "alice").await;
    let ws = create_workspace(&app, &token, "Acme").await;
    let products_uri = format!("/api/v1/workspaces/{}/products", ws["id"].as_str().expect("id"));

    let (status, body) = call(
        &app,
        Method::POST,
        &products_uri,
        &token,
        Some(json!({ "data": { "regularPrice": 3.5 } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "name");

    for name in ["Beans", "Filters", "Mugs"] {
        let (status, _) = call(
            &app,
            Method::POST,
            &products_uri,
            &token,
            Some(json!({ "data": { "name": name, "regularPrice": 10.0 } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, listed) = call(&app, Method::GET, &products_uri, &token, None).await;
    let names: Vec<&str> = listed["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Beans", "Filters", "Mugs"]);
}

#[rstest]
#[actix_web::test]
async fn malformed_path_ids_are_invalid_requests() {
    let app = actix_test::init_service(api_app(in_memory_state())).await;
    let token = register(&app, "alice").await;

    let (status, body) = call(&app, Method::GET, "/api/v1/products/not-a-uuid", &token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_uuid");
}
