use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use async_trait::async_trait;
use goat_api::sql::QueryBuf;
use goat_api::{app, AppState, ErrorExposure, Gateway, GatewayError, MemoryGateway, Settings, FIXTURE_GOATS};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn fixture_app() -> axum::Router {
    let gateway = Arc::new(MemoryGateway::with_goats(FIXTURE_GOATS));
    app(AppState::with_gateway(gateway, ErrorExposure::Raw), &Settings::default())
}

/// Gateway whose every call fails as if the connection pool were exhausted.
struct UnreachableGateway;

#[async_trait]
impl Gateway for UnreachableGateway {
    async fn query(&self, _q: &QueryBuf) -> Result<Vec<Value>, GatewayError> {
        Err(GatewayError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        Err(GatewayError::Database(sqlx::Error::PoolTimedOut))
    }
}

async fn send(router: &axum::Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    match body {
        Some(v) => send_raw(router, method, path, Some("application/json"), v.to_string()).await,
        None => send_raw(router, method, path, None, String::new()).await,
    }
}

async fn send_raw(
    router: &axum::Router,
    method: Method,
    path: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let req = builder.body(Body::from(body)).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(router: &axum::Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, method, path, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_returns_welcome() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "welcome");
    assert_eq!(body["description"], "GOAT API");
}

#[tokio::test]
async fn ready_reports_database_ok() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "database": "ok" }));
}

#[tokio::test]
async fn ready_reports_unreachable_database() {
    let state = AppState::with_gateway(Arc::new(UnreachableGateway), ErrorExposure::Raw);
    let router = app(state, &Settings::default());
    let (status, body) = send_json(&router, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "status": "degraded", "database": "unavailable" }));
}

#[tokio::test]
async fn health_returns_ok() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn version_reports_package() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "goat-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn list_with_database_down_is_500_with_raw_text() {
    let state = AppState::with_gateway(Arc::new(UnreachableGateway), ErrorExposure::Raw);
    let router = app(state, &Settings::default());
    let (status, body) = send_json(&router, Method::GET, "/goats", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], sqlx::Error::PoolTimedOut.to_string());
}

#[tokio::test]
async fn list_returns_every_goat() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::GET, "/goats", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), FIXTURE_GOATS.len());
    assert_eq!(data[0]["id"], 1);
}

#[tokio::test]
async fn list_of_empty_table_is_500() {
    let gateway = Arc::new(MemoryGateway::new());
    let router = app(AppState::with_gateway(gateway, ErrorExposure::Raw), &Settings::default());
    let (status, body) = send_json(&router, Method::GET, "/goats", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "No goats available.");
}

#[tokio::test]
async fn show_returns_goat_by_id() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::GET, "/goats/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert!(body["data"].is_object());
}

#[tokio::test]
async fn show_of_missing_id_is_404() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::GET, "/goats/4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "This goat does not exist!" }));
}

#[tokio::test]
async fn create_assigns_next_id() {
    let router = fixture_app();
    let new_goat = json!({ "name": "Cristiano Ronaldo", "age": 39 });
    let (status, body) = send_json(&router, Method::POST, "/goats", Some(new_goat)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Cristiano Ronaldo");
    assert_eq!(body["data"]["age"], 39);
    assert_eq!(body["data"]["id"], 4);

    let (status, body) = send_json(&router, Method::GET, "/goats/4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Cristiano Ronaldo");
}

#[tokio::test]
async fn create_without_age_is_400() {
    let router = fixture_app();
    let new_goat = json!({ "name": "Cristiano Ronaldo" });
    let (status, body) = send_json(&router, Method::POST, "/goats", Some(new_goat)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "age is missing");
}

#[tokio::test]
async fn create_without_name_is_400() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::POST, "/goats", Some(json!({ "age": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is missing");
}

#[tokio::test]
async fn create_with_malformed_body_is_400() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::POST, "/goats", Some(json!({ "name": "x", "age": "old" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_replaces_goat() {
    let router = fixture_app();
    let new_goat = json!({ "name": "Cristiano Ronaldo", "age": 39 });
    let (status, body) = send_json(&router, Method::PATCH, "/goats/2", Some(new_goat)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "id": 2, "name": "Cristiano Ronaldo", "age": 39 }));
}

#[tokio::test]
async fn update_of_missing_id_is_400() {
    let router = fixture_app();
    let new_goat = json!({ "name": "Cristiano Ronaldo", "age": 39 });
    let (status, body) = send_json(&router, Method::PATCH, "/goats/5", Some(new_goat)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This goat does not exist!");
}

#[tokio::test]
async fn update_with_missing_field_is_400() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::PATCH, "/goats/2", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "age or name missing");

    let (_, body) = send_json(&router, Method::GET, "/goats/2", None).await;
    assert_eq!(body["data"]["name"], FIXTURE_GOATS[1].0);
}

#[tokio::test]
async fn update_without_json_content_type_is_400() {
    let router = fixture_app();
    let raw = json!({ "name": "Cristiano Ronaldo", "age": 39 }).to_string();
    let (status, bytes) = send_raw(&router, Method::PATCH, "/goats/2", None, raw).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Content-Type"));
}

#[tokio::test]
async fn update_with_fractional_age_is_400() {
    let router = fixture_app();
    let new_goat = json!({ "name": "Cristiano Ronaldo", "age": 39.5 });
    let (status, body) = send_json(&router, Method::PATCH, "/goats/2", Some(new_goat)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = send_json(&router, Method::GET, "/goats/2", None).await;
    assert_eq!(body["data"]["age"], FIXTURE_GOATS[1].1);
}

#[tokio::test]
async fn delete_returns_204_and_removes_goat() {
    let router = fixture_app();
    let (status, bytes) = send(&router, Method::DELETE, "/goats/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());

    let (status, body) = send_json(&router, Method::GET, "/goats/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "This goat does not exist!");
}

#[tokio::test]
async fn delete_of_missing_id_is_404() {
    let router = fixture_app();
    let (status, body) = send_json(&router, Method::DELETE, "/goats/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "This goat does not exist!");
}
