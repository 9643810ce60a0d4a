//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → extractors (validation.rs, pagination.rs)
//!     → handler → Envelope (response.rs) or ApiError (error.rs)
//!     → middleware/envelope.rs (anything else → Envelope)
//!     → Send to client
//! ```

pub mod error;
pub mod middleware;
pub mod pagination;
pub mod request;
pub mod response;
pub mod server;
pub mod validation;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use response::{build_error, build_paginated, build_success, ApiResult, Envelope, Pagination};
pub use server::{with_middleware, AppState, HttpServer};
