//! Bearer-protected administration endpoints.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use self::auth::require_admin;
use self::handlers::get_stats;
use crate::http::server::AppState;

/// Routes mounted under `/api/v1/admin`. Only matched routes are guarded,
/// so unknown admin paths still answer 404.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
