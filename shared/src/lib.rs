//! Fluxgate Shared Library
//!
//! This crate contains the types shared between the Fluxgate ingestion
//! service and its load generator.
//!
//! # Modules
//!
//! - [`models`] - The wire-facing log entry and the time-series point model
//! - [`sink`] - The point sink trait and its implementations
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use shared::models::LogEntry;
//!
//! let entry = LogEntry::new("auth-service", "/api/login")
//!     .with_error("connection timeout");
//!
//! assert!(entry.validate_entry().is_ok());
//! assert_eq!(entry.to_point(Utc::now()).measurement(), "logs");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod models;
pub mod sink;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use validator;
