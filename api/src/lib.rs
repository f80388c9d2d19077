//! Fluxgate API Server
//!
//! This crate provides the HTTP ingestion service of Fluxgate. It accepts
//! log entries over HTTP, validates them, and writes them to InfluxDB as
//! time-series points with a bounded retry policy.
//!
//! # Architecture
//!
//! The server is built on Axum and Tokio, providing:
//! - `POST /` for single log entry ingestion (204 on success)
//! - `GET /health` as a liveness probe with no database dependency
//! - Startup gating on database health, and signal-driven graceful shutdown
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
pub mod db;
pub mod retry;
mod routes;
mod state;

pub use config::Config;
pub use routes::IngestError;
pub use state::AppState;

use anyhow::{Context, Result};
use axum::Router;
use db::{Database, DatabaseConfig};
use shared::sink::{InfluxSink, PointSink};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Largest request body the ingestion endpoint will read.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// How long in-flight requests get to finish after a shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Runs the Fluxgate ingestion service.
///
/// This function initializes the server with configuration from environment
/// variables, verifies the database is reachable, and starts listening for
/// incoming connections. It handles graceful shutdown on SIGTERM/SIGINT.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The database fails its startup health check
/// - The server fails to bind to the configured address
/// - In-flight requests do not drain within the shutdown grace period
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    run_server_with_config(config).await
}

/// Runs the Fluxgate ingestion service with the provided configuration.
///
/// This is useful for testing or when you want to provide configuration
/// programmatically. The database connection is still read from the
/// environment.
///
/// # Errors
///
/// See [`run_server`].
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let db_config = DatabaseConfig::from_env().context("Database configuration incomplete")?;
    let database = Database::new(&db_config);
    let sink = InfluxSink::new_shared(database.client(), &db_config.bucket);

    // Refuse to start serving traffic we cannot store
    sink.health()
        .await
        .context("Database failed the startup health check")?;

    tracing::info!(
        url = %db_config.url,
        org = %db_config.org,
        bucket = %db_config.bucket,
        "Database healthy"
    );

    serve(config, AppState::new(sink)).await
}

/// Serves requests until a shutdown signal arrives, then drains in-flight
/// requests within [`SHUTDOWN_GRACE`].
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve, or if draining
/// exceeds the grace period.
pub async fn serve(config: Config, state: AppState) -> Result<()> {
    let shutdown = CancellationToken::new();
    tokio::spawn(watch_for_signals(shutdown.clone()));
    serve_with_shutdown(config, state, shutdown).await
}

/// Binds the listener and serves requests until `shutdown` is cancelled,
/// then drains in-flight requests within [`SHUTDOWN_GRACE`].
///
/// [`serve`] wires the token to SIGTERM/SIGINT; callers that own the token
/// can drive shutdown themselves.
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve, or if draining
/// exceeds the grace period.
pub async fn serve_with_shutdown(
    config: Config,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr = config.socket_addr();

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Fluxgate ingestion service starting"
    );

    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");

    drain_on_shutdown(listener, create_router(state), shutdown, SHUTDOWN_GRACE).await
}

/// Serves `app` on `listener` until `shutdown` is cancelled, then gives
/// in-flight requests `grace` to finish before giving up on the drain.
async fn drain_on_shutdown(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
    grace: Duration,
) -> Result<()> {
    let drain = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { drain.cancelled().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // the server stopped on its own, before any shutdown was requested
            result.context("Server task panicked")??;
            return Ok(());
        }
        () = shutdown.cancelled() => {
            tracing::info!("Draining in-flight requests");
        }
    }

    match tokio::time::timeout(grace, server).await {
        Ok(result) => {
            result.context("Server task panicked")??;
            tracing::info!("Server shutdown complete");
            Ok(())
        }
        Err(_) => anyhow::bail!(
            "In-flight requests did not drain within {}s",
            grace.as_secs()
        ),
    }
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a
/// full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::ingest_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT) and cancels the token.
async fn watch_for_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    shutdown.cancel();
}
