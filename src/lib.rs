//! Storefront API library: a small JSON API whose every response, success or
//! failure, is wrapped in one envelope shape.

pub mod admin;
pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routes;

pub use config::Settings;
pub use http::{ApiError, Envelope, HttpServer};
pub use lifecycle::Shutdown;
