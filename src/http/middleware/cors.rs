//! CORS layer built from settings.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

const WILDCARD: &str = "*";

/// Build the CORS layer. Credentials are allowed, so a `*` entry mirrors the
/// request value instead of sending a literal wildcard.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = config.allowed_origins_list();
    let methods = config.allowed_methods_list();
    let headers = config.allowed_headers_list();

    let allow_origin = if origins.iter().any(|o| o == WILDCARD) {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| parse_or_warn(o, HeaderValue::from_str)))
    };

    let allow_methods = if methods.iter().any(|m| m == WILDCARD) {
        AllowMethods::mirror_request()
    } else {
        AllowMethods::list(
            methods
                .iter()
                .filter_map(|m| parse_or_warn(m, |s| Method::from_bytes(s.as_bytes()))),
        )
    };

    let allow_headers = if headers.iter().any(|h| h == WILDCARD) {
        AllowHeaders::mirror_request()
    } else {
        AllowHeaders::list(
            headers
                .iter()
                .filter_map(|h| parse_or_warn(h, |s| HeaderName::from_bytes(s.as_bytes()))),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(allow_methods)
        .allow_headers(allow_headers)
        .allow_credentials(true)
}

fn parse_or_warn<T, E: std::fmt::Display>(raw: &str, parse: impl Fn(&str) -> Result<T, E>) -> Option<T> {
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(entry = %raw, error = %e, "Ignoring invalid CORS entry");
            None
        }
    }
}
