//! Data models for the Fluxgate ingestion pipeline.
//!
//! This module contains the wire-facing log entry and the time-series point
//! it is converted into.

pub mod log;
pub mod point;

pub use log::{LogEntry, LogValidationError, LOGS_MEASUREMENT};
pub use point::Point;
