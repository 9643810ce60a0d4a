//! Failure taxonomy and its mapping onto the response envelope.
//!
//! Every failure raised by a handler, an extractor or the framework ends up
//! as an [`ApiError`] and leaves the server as an [`Envelope`].

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::response::{build_error, Envelope};
use crate::http::validation::{FieldError, FieldErrors, LocSegment};

/// Default detail strings for each failure category.
pub mod detail {
    pub const INTERNAL: &str = "Internal server error";
    pub const VALIDATION: &str = "Validation error";
    pub const AUTHENTICATION: &str = "Authentication failed";
    pub const AUTHORIZATION: &str = "Insufficient permissions";
    pub const CONFLICT: &str = "Resource conflict";
    pub const DATABASE: &str = "Database operation failed";
}

/// Credential scheme advertised on authentication failures.
pub const AUTH_SCHEME: &str = "Bearer";

/// Boxed source error for unexpected failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested resource does not exist.
    #[error("{}", not_found_detail(.resource, .id.as_deref()))]
    NotFound { resource: String, id: Option<String> },

    /// A domain rule rejected the input as a whole.
    #[error("{0}")]
    Validation(String),

    /// Credentials are missing or malformed.
    #[error("{0}")]
    Authentication(String),

    /// Credentials are valid but do not grant access.
    #[error("{0}")]
    Authorization(String),

    /// The operation conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// The storage layer failed.
    #[error("{0}")]
    Database(String),

    /// A failure that carries its own status, usually produced by the framework.
    #[error("{detail}")]
    Http { status: StatusCode, detail: String },

    /// One or more input fields failed validation.
    #[error("Validation error: {0}")]
    InvalidInput(FieldErrors),

    /// Anything unclassified. The source is logged, never sent to clients.
    #[error("Internal server error: {0}")]
    Internal(#[source] BoxError),
}

fn not_found_detail(resource: &str, id: Option<&str>) -> String {
    match id {
        Some(id) if !id.is_empty() => format!("{resource} with id '{id}' not found"),
        _ => format!("{resource} not found"),
    }
}

impl ApiError {
    /// Not-found failure for a resource identified by `id`.
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.to_string()),
        }
    }

    /// Not-found failure without an identifier.
    pub fn resource_not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: None,
        }
    }

    pub fn authentication() -> Self {
        Self::Authentication(detail::AUTHENTICATION.to_string())
    }

    pub fn authorization() -> Self {
        Self::Authorization(detail::AUTHORIZATION.to_string())
    }

    /// Transport-declared failure with the status' canonical reason as detail.
    pub fn from_status(status: StatusCode) -> Self {
        Self::Http {
            status,
            detail: status.canonical_reason().unwrap_or("Error").to_string(),
        }
    }

    pub fn internal(source: impl Into<BoxError>) -> Self {
        Self::Internal(source.into())
    }

    /// Status code this failure is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Http { status, .. } => *status,
        }
    }

    /// Normalize this failure into an error envelope.
    pub fn to_envelope(&self) -> Envelope {
        match self {
            Self::Internal(_) => build_error(detail::INTERNAL, self.status(), None),
            Self::InvalidInput(errors) => {
                build_error(detail::VALIDATION, self.status(), Some(errors.to_map()))
            }
            other => build_error(other.to_string(), other.status(), None),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let mut response = self.to_envelope().into_response();
        if matches!(self, Self::Authentication(_)) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_SCHEME));
        }
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                let mut errors = FieldErrors::new();
                errors.push(FieldError::new(
                    vec![LocSegment::key("body")],
                    rejection.body_text(),
                ));
                Self::InvalidInput(errors)
            }
            other => Self::Http {
                status: other.status(),
                detail: other.body_text(),
            },
        }
    }
}
