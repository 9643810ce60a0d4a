//! Route table for `/api/v1`.

pub mod health;
pub mod products;
pub mod root;

use axum::{routing::get, Router};

use crate::admin;
use crate::http::server::AppState;

/// Routes mounted under `/api/v1`.
pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::detailed))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{product_id}",
            get(products::get).put(products::replace).delete(products::delete),
        )
        .nest("/admin", admin::router(state))
}
