use std::sync::atomic::Ordering;

use axum::extract::State;
use serde::Serialize;

use crate::http::response::{ok, ApiResult};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub version: &'static str,
    pub environment: String,
    pub requests_served: u64,
    pub products: usize,
    pub uptime_secs: u64,
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<AdminStats> {
    let stats = AdminStats {
        version: env!("CARGO_PKG_VERSION"),
        environment: state.settings.app.environment.clone(),
        requests_served: state.request_count.load(Ordering::Relaxed),
        products: state.catalog.len()?,
        uptime_secs: state.started_at.elapsed().as_secs(),
    };
    Ok(ok(stats, "Statistics retrieved"))
}
