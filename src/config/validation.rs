//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check that CORS entries are valid header values and methods
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>
//! - Runs before settings are accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::Settings;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("app.name must not be empty")]
    EmptyAppName,

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("server.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("cors.allowed_origins entry '{0}' is not a valid origin")]
    InvalidOrigin(String),

    #[error("cors.allowed_methods entry '{0}' is not a valid HTTP method")]
    InvalidMethod(String),

    #[error("cors.allowed_headers entry '{0}' is not a valid header name")]
    InvalidHeader(String),

    #[error("observability.log_level '{0}' is not a valid filter directive")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check `settings` and return every problem found.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.app.name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
    }
    if settings.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if settings.server.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    for origin in settings.cors.allowed_origins_list() {
        if origin != "*" && HeaderValue::from_str(&origin).is_err() {
            errors.push(ValidationError::InvalidOrigin(origin));
        }
    }
    for method in settings.cors.allowed_methods_list() {
        if method != "*" && Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod(method));
        }
    }
    for name in settings.cors.allowed_headers_list() {
        if name != "*" && HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeader(name));
        }
    }

    if EnvFilter::try_new(&settings.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            settings.observability.log_level.clone(),
        ));
    }
    if settings.observability.metrics_enabled
        && settings
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            settings.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_settings(&Settings::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut settings = Settings::default();
        settings.app.name = " ".into();
        settings.server.request_timeout_secs = 0;
        settings.cors.allowed_methods = "GET,NOT A METHOD".into();
        settings.cors.allowed_headers = "x-ok,bad header".into();

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyAppName,
                ValidationError::ZeroTimeout,
                ValidationError::InvalidMethod("NOT A METHOD".into()),
                ValidationError::InvalidHeader("bad header".into()),
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut settings = Settings::default();
        settings.observability.metrics_address = "nowhere".into();
        assert!(validate_settings(&settings).is_ok());

        settings.observability.metrics_enabled = true;
        assert_eq!(
            validate_settings(&settings),
            Err(vec![ValidationError::InvalidMetricsAddress("nowhere".into())])
        );
    }

    #[test]
    fn test_invalid_origin() {
        let mut settings = Settings::default();
        settings.cors.allowed_origins = "http://ok.test,http://bad\u{7f}.test".into();
        let errors = validate_settings(&settings).unwrap_err();
        assert!(matches!(errors.as_slice(), [ValidationError::InvalidOrigin(_)]));
    }
}
