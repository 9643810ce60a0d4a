//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, limits, error envelopes)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::http::middleware::{cors_layer, envelope, handle_panic, normalize_error_responses, track_requests};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::routes;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<Catalog>,
    /// Requests seen since startup.
    pub request_count: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings, catalog: Catalog) -> Self {
        Self {
            settings: Arc::new(settings),
            catalog: Arc::new(catalog),
            request_count: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }
}

/// HTTP server for the API.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server with an empty catalog.
    pub fn new(settings: Settings) -> Self {
        Self::with_state(AppState::new(settings, Catalog::new()))
    }

    pub fn with_state(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    fn build_router(state: AppState) -> Router {
        let routes = Router::new()
            .route("/", get(routes::root::index))
            .nest("/api/v1", routes::api_router(state.clone()))
            .fallback(envelope::not_found)
            .with_state(state.clone());
        with_middleware(routes, &state)
    }

    /// A handle to the router, for driving it without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, then drain connections.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            app = %self.state.settings.app.name,
            environment = %self.state.settings.app.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wrap `routes` in the full middleware stack, outermost last.
#[allow(deprecated)]
pub fn with_middleware(routes: Router, state: &AppState) -> Router {
    let settings = &state.settings;

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(settings.server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(settings.server.request_timeout_secs)))
        .layer(middleware::from_fn(normalize_error_responses))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(cors_layer(&settings.cors))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id(request.headers()),
            )
        }))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}
