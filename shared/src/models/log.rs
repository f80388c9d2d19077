//! Log data model.
//!
//! Defines the core `LogEntry` structure accepted by the ingestion endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::models::point::Point;

/// Measurement name under which accepted log entries are written.
pub const LOGS_MEASUREMENT: &str = "logs";

/// A log entry submitted by a client for ingestion.
///
/// `service` and `endpoint` identify where the entry came from and must be
/// non-empty; `error` and `traceback` carry the diagnostic payload and may be
/// empty. Fields absent from the wire representation decode to empty strings,
/// so a missing `service` is rejected by validation rather than by the
/// deserializer.
///
/// # Example
///
/// ```
/// use shared::models::LogEntry;
///
/// let entry = LogEntry::new("auth-service", "/api/login")
///     .with_error("connection timeout")
///     .with_traceback("File \"/auth/session.py\", line 42, in refresh");
///
/// assert!(entry.validate_entry().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LogEntry {
    /// Name of the service that emitted the entry.
    #[serde(default)]
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service: String,

    /// Endpoint the entry was observed on.
    #[serde(default)]
    #[validate(length(min = 1, message = "Endpoint cannot be empty"))]
    pub endpoint: String,

    /// Error message. May be empty.
    #[serde(default)]
    pub error: String,

    /// Stack trace or other diagnostic detail. May be empty.
    #[serde(default)]
    pub traceback: String,
}

/// Errors that can occur during log entry validation.
#[derive(Debug, Error)]
pub enum LogValidationError {
    /// The service name is empty.
    #[error("Service name cannot be empty")]
    EmptyService,

    /// The endpoint is empty.
    #[error("Endpoint cannot be empty")]
    EmptyEndpoint,

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl LogEntry {
    /// Creates a new log entry with empty diagnostic fields.
    ///
    /// # Arguments
    ///
    /// * `service` - The name of the service that emitted the entry
    /// * `endpoint` - The endpoint the entry was observed on
    ///
    /// # Example
    ///
    /// ```
    /// use shared::models::LogEntry;
    ///
    /// let entry = LogEntry::new("payment-service", "/api/payments");
    /// assert_eq!(entry.service, "payment-service");
    /// assert!(entry.error.is_empty());
    /// ```
    #[must_use]
    pub fn new(service: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            endpoint: endpoint.into(),
            error: String::new(),
            traceback: String::new(),
        }
    }

    /// Sets the error message.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    /// Sets the traceback.
    #[must_use]
    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = traceback.into();
        self
    }

    /// Validates the log entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service name is empty
    /// - The endpoint is empty
    pub fn validate_entry(&self) -> Result<(), LogValidationError> {
        if self.service.is_empty() {
            return Err(LogValidationError::EmptyService);
        }
        if self.endpoint.is_empty() {
            return Err(LogValidationError::EmptyEndpoint);
        }
        self.validate()?;
        Ok(())
    }

    /// Converts the entry into a time-series point under the `logs`
    /// measurement.
    ///
    /// `service` and `endpoint` become tags, `error` and `traceback` become
    /// fields. The timestamp is supplied by the caller so that the point
    /// carries the server's receipt time, not anything claimed by the client.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use shared::models::LogEntry;
    ///
    /// let point = LogEntry::new("user-service", "/api/users")
    ///     .with_error("boom")
    ///     .to_point(Utc::now());
    ///
    /// assert_eq!(point.measurement(), "logs");
    /// assert_eq!(point.tag("service"), Some("user-service"));
    /// assert_eq!(point.field("error"), Some("boom"));
    /// ```
    #[must_use]
    pub fn to_point(&self, timestamp: DateTime<Utc>) -> Point {
        Point::new(LOGS_MEASUREMENT, timestamp)
            .with_tag("service", &self.service)
            .with_tag("endpoint", &self.endpoint)
            .with_field("error", &self.error)
            .with_field("traceback", &self.traceback)
    }
}
