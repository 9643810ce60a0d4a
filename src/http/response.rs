//! Response envelope construction.
//!
//! # Responsibilities
//! - Wrap every response body in the same JSON envelope
//! - Derive pagination metadata from `(total, page, page_size)`
//! - Keep the body `status_code` equal to the transport status
//!
//! # Design Decisions
//! - Envelopes are only built through `build_success`, `build_error` and
//!   `build_paginated`; fields are private so `data` and `errors` can never
//!   both be set
//! - Builders are pure: no clock, no counters, same input gives the same bytes
//! - `page_size` is a `NonZeroU64`, so a zero page size cannot reach the math

use std::collections::BTreeMap;
use std::num::NonZeroU64;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Mapping from a dotted field path to a validation message.
pub type FieldErrorMap = BTreeMap<String, String>;

/// Result type returned by handlers.
pub type ApiResult<T> = Result<Envelope<T>, crate::http::error::ApiError>;

/// The uniform JSON shape wrapping every response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T = serde_json::Value> {
    success: bool,
    message: String,
    #[serde(with = "status_code")]
    status_code: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrorMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    /// Whether the originating operation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status the envelope is sent with.
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn errors(&self) -> Option<&FieldErrorMap> {
        self.errors.as_ref()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    total: u64,
    page: u64,
    page_size: NonZeroU64,
    total_pages: u64,
    has_next: bool,
    has_previous: bool,
}

impl Pagination {
    /// Derive the page counters from the total item count.
    pub fn new(total: u64, page: u64, page_size: NonZeroU64) -> Self {
        let total_pages = total.div_ceil(page_size.get());
        Self {
            total,
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> NonZeroU64 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }
}

/// Build a success envelope. `None` omits the `data` key entirely.
pub fn build_success<T>(data: Option<T>, message: impl Into<String>, status: StatusCode) -> Envelope<T> {
    Envelope {
        success: true,
        message: message.into(),
        status_code: status,
        data,
        errors: None,
        pagination: None,
    }
}

/// Shorthand for a `200 OK` success envelope carrying `data`.
pub fn ok<T>(data: T, message: impl Into<String>) -> Envelope<T> {
    build_success(Some(data), message, StatusCode::OK)
}

/// Build an error envelope. `errors` is only emitted when non-empty.
pub fn build_error<T>(
    message: impl Into<String>,
    status: StatusCode,
    errors: Option<FieldErrorMap>,
) -> Envelope<T> {
    Envelope {
        success: false,
        message: message.into(),
        status_code: status,
        data: None,
        errors: errors.filter(|errors| !errors.is_empty()),
        pagination: None,
    }
}

/// Build a `200 OK` envelope for one page of a list.
pub fn build_paginated<T>(
    items: Vec<T>,
    total: u64,
    page: u64,
    page_size: NonZeroU64,
    message: impl Into<String>,
) -> Envelope<Vec<T>> {
    Envelope {
        success: true,
        message: message.into(),
        status_code: StatusCode::OK,
        data: Some(items),
        errors: None,
        pagination: Some(Pagination::new(total, page, page_size)),
    }
}

mod status_code {
    use axum::http::StatusCode;
    use serde::Serializer;

    pub(super) fn serialize<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(status.as_u16())
    }
}
