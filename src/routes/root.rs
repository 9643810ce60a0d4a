//! Service landing endpoint.

use axum::extract::State;
use serde::Serialize;

use crate::http::response::{ok, Envelope};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: &'static str,
    pub health: &'static str,
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Envelope<ServiceInfo> {
    let name = state.settings.app.name.clone();
    let message = format!("Welcome to {name}");
    ok(
        ServiceInfo {
            name,
            version: env!("CARGO_PKG_VERSION"),
            health: "/api/v1/health",
        },
        message,
    )
}
