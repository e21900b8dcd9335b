#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use roofquote_core::store::{MemoryQuoteStore, QuoteStore};
use serde_json::Value;
use tower::ServiceExt;

use roofquote_api::config::{Environment, ServerConfig, StoreBackend};
use roofquote_api::router::build_app_router;
use roofquote_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        store_backend: StoreBackend::Memory,
        environment: Environment::Production,
        ..ServerConfig::default()
    }
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(MemoryQuoteStore::new()), test_config())
}

/// Build the full application router over the given store and config,
/// with the same middleware stack production uses.
pub fn build_test_app_with(store: Arc<dyn QuoteStore>, config: ServerConfig) -> Router {
    let state = AppState::new(store, config);
    build_app_router(state).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// A valid submission body with a project date a few weeks out.
pub fn valid_submission() -> Value {
    let project_date = (chrono::Utc::now() + chrono::Duration::days(30))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string();
    serde_json::json!({
        "contractorName": "John Smith",
        "company": "Smith Roofing LLC",
        "roofSize": 2500,
        "roofType": "Metal",
        "projectCity": "Austin",
        "projectState": "TX",
        "projectDate": project_date,
    })
}

/// Submit a body and return the stored quote JSON.
pub async fn submit(app: &Router, body: Value) -> Value {
    let response = post_json(app.clone(), "/api/quotes", body).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["quote"].clone()
}
