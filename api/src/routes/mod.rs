//! API route definitions.
//!
//! This module organizes all HTTP routes for the Fluxgate ingestion service.

mod health;
mod ingest;

pub use health::health_routes;
pub use ingest::{ingest_routes, IngestError};
