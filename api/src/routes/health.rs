//! Health check endpoint.
//!
//! Provides a simple liveness probe for load balancers and container
//! orchestrators.

use axum::{routing::get, Router};

/// Creates the health check routes.
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
///
/// Answers `OK` whenever the process is serving requests. It deliberately
/// has no database dependency: a degraded backend shows up as failed writes
/// and a startup gate, not as a dead process.
async fn health_check() -> &'static str {
    "OK"
}
