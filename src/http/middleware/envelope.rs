//! Conversion of framework-produced errors into envelopes.
//!
//! Handlers and extractors already return envelopes. Everything else that can
//! fail (routing misses, wrong methods, timeouts, panics) produces a bare
//! response, which is rewritten here so clients only ever see one shape.

use std::any::Any;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;

/// Longest bare error body reused as the envelope message.
const MAX_DETAIL_BYTES: usize = 1024;

/// Rewrite non-JSON error responses as envelopes.
pub async fn normalize_error_responses(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !is_error(status) || is_json(response.headers()) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let detail = read_detail(body).await;
    let error = match detail {
        Some(detail) => ApiError::Http { status, detail },
        None => ApiError::from_status(status),
    };

    let mut normalized = error.into_response();
    let own = normalized.headers().clone();
    for (name, value) in &parts.headers {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH || own.contains_key(name) {
            continue;
        }
        normalized.headers_mut().append(name.clone(), value.clone());
    }
    normalized
}

/// Final handler for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::from_status(StatusCode::NOT_FOUND)
}

/// Response for a panicking handler.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::internal(format!("handler panicked: {detail}")).into_response()
}

fn is_error(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

async fn read_detail(body: Body) -> Option<String> {
    let bytes = to_bytes(body, MAX_DETAIL_BYTES).await.ok()?;
    let text = String::from_utf8(bytes.to_vec()).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderValue, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app() -> Router {
        Router::new()
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .route("/empty", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .route("/fine", get(|| async { "plain success" }))
            .route("/throttled", get(throttled))
            .layer(middleware::from_fn(normalize_error_responses))
    }

    #[tokio::test]
    async fn test_bare_error_uses_body_as_detail() {
        let request = Request::builder().uri("/teapot").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["status_code"], 418);
        assert_eq!(body["message"], "short and stout");
    }

    #[tokio::test]
    async fn test_empty_error_uses_canonical_reason() {
        let request = Request::builder().uri("/empty").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        let body = body_json(response).await;
        assert_eq!(body["message"], "Service Unavailable");
    }

    #[tokio::test]
    async fn test_method_not_allowed_keeps_allow_header() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/fine")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
        let body = body_json(response).await;
        assert_eq!(body["message"], "Method Not Allowed");
    }

    async fn throttled() -> Response {
        let mut response = (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response();
        let headers = response.headers_mut();
        headers.append("x-retry-hint", HeaderValue::from_static("backoff"));
        headers.append("x-retry-hint", HeaderValue::from_static("jitter"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        response
    }

    #[tokio::test]
    async fn test_repeated_headers_survive_rewrite() {
        let request = Request::builder().uri("/throttled").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let hints: Vec<_> = response.headers().get_all("x-retry-hint").iter().collect();
        assert_eq!(hints, ["backoff", "jitter"]);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_json(response).await["message"], "slow down");
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let request = Request::builder().uri("/fine").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"plain success");
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_500() {
        let response = handle_panic(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("errors").is_none());
    }
}
