//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use storefront_api::catalog::{Catalog, NewProduct};
use storefront_api::http::AppState;
use storefront_api::{HttpServer, Settings};
use tower::ServiceExt;

pub const ADMIN_KEY: &str = "test-admin-key";

/// Settings suitable for tests: ephemeral port, admin key set.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.server.host = "127.0.0.1".into();
    settings.server.port = 0;
    settings.app.environment = "test".into();
    settings.admin.api_key = Some(ADMIN_KEY.into());
    settings
}

pub fn new_product(name: &str, price: f64) -> NewProduct {
    NewProduct {
        name: name.into(),
        price,
        ..Default::default()
    }
}

/// A server whose catalog holds `count` products named `Product 1..=count`.
pub fn server_with_products(count: u64) -> HttpServer {
    let catalog = Catalog::with_products((1..=count).map(|i| new_product(&format!("Product {i}"), i as f64)))
        .expect("seed catalog");
    HttpServer::with_state(AppState::new(test_settings(), catalog))
}

/// Drive one request through the router without a socket.
pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.expect("router is infallible")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response into its status and parsed JSON body.
pub async fn envelope(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", String::from_utf8_lossy(&bytes)));
    (status, body)
}

/// Assert the shape rules every envelope must follow.
pub fn assert_envelope(status: StatusCode, body: &Value) {
    assert_eq!(body["status_code"].as_u64(), Some(u64::from(status.as_u16())), "body status must match transport status");
    assert!(body["message"].is_string(), "message is always present");
    let success = body["success"].as_bool().expect("success is a bool");
    assert_eq!(success, status.is_success() || status.is_redirection());
    assert!(
        !(body.get("data").is_some() && body.get("errors").is_some()),
        "data and errors are mutually exclusive"
    );
    if !success {
        assert!(body.get("data").is_none(), "failures never carry data");
    }
}
