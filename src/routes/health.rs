//! Health check endpoints.

use axum::extract::State;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::http::response::{ok, Envelope};
use crate::http::server::AppState;

const HEALTHY: &str = "healthy";
const MESSAGE: &str = "Service is healthy";

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    pub service: String,
    pub version: &'static str,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthReport {
    pub status: &'static str,
    pub timestamp: String,
    pub service: ServiceSection,
    pub server: ServerSection,
    pub database: DatabaseSection,
}

#[derive(Debug, Serialize)]
pub struct ServiceSection {
    pub name: String,
    pub version: &'static str,
    pub environment: String,
    pub debug: bool,
}

#[derive(Debug, Serialize)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize)]
pub struct DatabaseSection {
    /// Scheme only; credentials are masked.
    pub url: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `GET /api/v1/health`
pub async fn health(State(state): State<AppState>) -> Envelope<HealthReport> {
    let app = &state.settings.app;
    ok(
        HealthReport {
            status: HEALTHY,
            timestamp: now(),
            service: app.name.clone(),
            version: env!("CARGO_PKG_VERSION"),
            environment: app.environment.clone(),
        },
        MESSAGE,
    )
}

/// `GET /api/v1/health/detailed`
pub async fn detailed(State(state): State<AppState>) -> Envelope<DetailedHealthReport> {
    let settings = &state.settings;
    ok(
        DetailedHealthReport {
            status: HEALTHY,
            timestamp: now(),
            service: ServiceSection {
                name: settings.app.name.clone(),
                version: env!("CARGO_PKG_VERSION"),
                environment: settings.app.environment.clone(),
                debug: settings.app.debug,
            },
            server: ServerSection {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            database: DatabaseSection {
                url: settings.database.masked_url(),
            },
        },
        MESSAGE,
    )
}
