//! Storefront API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ cors ─▶ tracking ─▶ envelope normalizer
//!                                                                     │
//!                                                                     ▼
//!                                            timeout ─▶ panic catcher ─▶ router
//!                                                                     │
//!                      ┌──────────────┬───────────────┬──────────────┤
//!                      ▼              ▼               ▼              ▼
//!                   /health      /products        /admin/stats    fallback
//!                                    │
//!                                    ▼
//!                              catalog (AppState)
//!
//!     Client Response ◀── Envelope { success, message, status_code, data | errors, pagination? }
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use storefront_api::config::load_settings;
use storefront_api::lifecycle::{signals, Shutdown};
use storefront_api::observability::{logging, metrics};
use storefront_api::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "storefront-api")]
#[command(about = "Storefront JSON API server", long_about = None)]
struct Args {
    /// Path to a TOML settings file.
    #[arg(short, long, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    logging::init_logging(&settings.observability)?;

    tracing::info!(
        app = %settings.app.name,
        version = env!("CARGO_PKG_VERSION"),
        environment = %settings.app.environment,
        "Starting up"
    );

    if settings.observability.metrics_enabled {
        let addr: SocketAddr = settings.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(settings.server.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::wait_for_shutdown(shutdown));

    HttpServer::new(settings).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
