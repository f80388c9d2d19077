//! Point sink trait and implementations.
//!
//! Provides the `PointSink` trait for abstracting time-series writes and
//! health checks, an `InMemorySink` implementation for development and
//! testing, and an `InfluxSink` implementation for production use.

use async_trait::async_trait;
use futures::stream;
use influxdb2::models::health::Status;
use influxdb2::models::DataPoint;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::models::Point;

/// Errors that can occur during sink operations.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The database rejected or failed the write.
    #[error("Failed to write point: {0}")]
    Write(String),

    /// The database is unreachable or reported an unhealthy status.
    #[error("Database unhealthy: {0}")]
    Unhealthy(String),

    /// The point could not be converted to the database's wire model.
    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    /// Failed to acquire lock on the sink.
    #[error("Failed to acquire lock on sink")]
    LockError,
}

/// Trait for time-series sink implementations.
///
/// This trait defines the write-side interface the ingestion service depends
/// on. Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait PointSink: Send + Sync {
    /// Writes a single point to the sink.
    ///
    /// One call is one write attempt; retry policy lives with the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn write_point(&self, point: Point) -> Result<(), SinkError>;

    /// Checks that the sink's backing store is reachable and healthy.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or reports an unhealthy
    /// status.
    async fn health(&self) -> Result<(), SinkError>;
}

/// In-memory sink implementation.
///
/// Stores points in a `Vec` protected by a `RwLock`. It is suitable for
/// development and testing; its health check always passes.
///
/// **Note:** Data is not persisted across restarts.
///
/// # Example
///
/// ```
/// use shared::sink::InMemorySink;
///
/// let sink = InMemorySink::new();
/// assert_eq!(sink.count().unwrap(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySink {
    points: Arc<RwLock<Vec<Point>>>,
}

impl InMemorySink {
    /// Creates a new empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a new in-memory sink wrapped in an Arc.
    ///
    /// This is useful when sharing the sink across multiple handlers while
    /// keeping a concrete handle for inspection.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns a snapshot of all points written so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn points(&self) -> Result<Vec<Point>, SinkError> {
        let points = self.points.read().map_err(|_| SinkError::LockError)?;
        Ok(points.clone())
    }

    /// Returns the number of points written so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn count(&self) -> Result<usize, SinkError> {
        let points = self.points.read().map_err(|_| SinkError::LockError)?;
        Ok(points.len())
    }
}

#[async_trait]
impl PointSink for InMemorySink {
    async fn write_point(&self, point: Point) -> Result<(), SinkError> {
        let mut points = self.points.write().map_err(|_| SinkError::LockError)?;
        points.push(point);
        Ok(())
    }

    async fn health(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// InfluxDB-backed sink implementation.
///
/// Translates points into the InfluxDB v2 write model and submits them to
/// the configured bucket. The health check goes through the server's health
/// endpoint.
#[derive(Clone)]
pub struct InfluxSink {
    client: Arc<influxdb2::Client>,
    bucket: String,
}

impl InfluxSink {
    /// Creates a new InfluxDB sink writing to the given bucket.
    #[must_use]
    pub fn new(client: Arc<influxdb2::Client>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Creates a new InfluxDB sink wrapped in an Arc.
    #[must_use]
    pub fn new_shared(client: Arc<influxdb2::Client>, bucket: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(client, bucket))
    }

    fn data_point(point: &Point) -> Result<DataPoint, SinkError> {
        let mut builder = DataPoint::builder(point.measurement());
        for (name, value) in point.tags() {
            builder = builder.tag(name.clone(), value.clone());
        }
        for (name, value) in point.fields() {
            builder = builder.field(name.clone(), value.clone());
        }
        builder = builder.timestamp(point.timestamp().timestamp_nanos_opt().unwrap_or(0));
        builder
            .build()
            .map_err(|e| SinkError::InvalidPoint(e.to_string()))
    }
}

#[async_trait]
impl PointSink for InfluxSink {
    async fn write_point(&self, point: Point) -> Result<(), SinkError> {
        let data_point = Self::data_point(&point)?;
        self.client
            .write(&self.bucket, stream::iter(vec![data_point]))
            .await
            .map_err(|e| SinkError::Write(e.to_string()))
    }

    async fn health(&self) -> Result<(), SinkError> {
        let health = self
            .client
            .health()
            .await
            .map_err(|e| SinkError::Unhealthy(e.to_string()))?;
        match health.status {
            Status::Pass => Ok(()),
            _ => Err(SinkError::Unhealthy(
                "server reported failing status".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio_test::assert_ok;

    fn create_test_point(service: &str) -> Point {
        Point::new("logs", Utc::now())
            .with_tag("service", service)
            .with_tag("endpoint", "/api/test")
            .with_field("error", "boom")
            .with_field("traceback", "")
    }

    #[test]
    fn test_new_sink_is_empty() {
        let sink = InMemorySink::new();
        assert_eq!(sink.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_write_single_point() {
        let sink = InMemorySink::new();

        assert_ok!(sink.write_point(create_test_point("auth-service")).await);

        assert_eq!(sink.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_points_returns_written_points() {
        let sink = InMemorySink::new();
        sink.write_point(create_test_point("user-service"))
            .await
            .unwrap();
        sink.write_point(create_test_point("payment-service"))
            .await
            .unwrap();

        let points = sink.points().unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].tag("service"), Some("user-service"));
        assert_eq!(points[1].tag("service"), Some("payment-service"));
    }

    #[tokio::test]
    async fn test_in_memory_health_always_passes() {
        let sink = InMemorySink::new();
        assert_ok!(sink.health().await);
    }

    #[tokio::test]
    async fn test_sink_usable_as_trait_object() {
        let sink: Arc<dyn PointSink> = InMemorySink::new_shared();
        assert_ok!(sink.write_point(create_test_point("auth-service")).await);
    }

    #[tokio::test]
    async fn test_sink_is_thread_safe() {
        let sink = InMemorySink::new_shared();
        let mut handles = vec![];

        for i in 0..10 {
            let sink_clone = Arc::clone(&sink);
            let handle = tokio::spawn(async move {
                sink_clone
                    .write_point(create_test_point(&format!("service-{i}")))
                    .await
                    .unwrap();
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(sink.count().unwrap(), 10);
    }

    #[test]
    fn test_influx_data_point_conversion() {
        let point = create_test_point("auth-service");

        assert_ok!(InfluxSink::data_point(&point));
    }

    #[test]
    fn test_influx_data_point_requires_a_field() {
        // the wire model rejects points without at least one field
        let point = Point::new("logs", Utc::now()).with_tag("service", "auth-service");

        assert!(InfluxSink::data_point(&point).is_err());
    }

    fn influx_sink_for(url: String) -> InfluxSink {
        let client = Arc::new(influxdb2::Client::new(url, "test-org", "test-token"));
        InfluxSink::new(client, "logs")
    }

    #[tokio::test]
    async fn test_influx_health_passes_on_passing_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "influxdb", "status": "pass"}"#)
            .create_async()
            .await;
        let sink = influx_sink_for(server.url());

        assert_ok!(sink.health().await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_influx_health_fails_on_failing_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "influxdb", "message": "service unavailable", "status": "fail"}"#)
            .create_async()
            .await;
        let sink = influx_sink_for(server.url());

        let error = sink.health().await.unwrap_err();
        assert!(matches!(error, SinkError::Unhealthy(_)));
    }

    #[tokio::test]
    async fn test_influx_health_fails_when_unreachable() {
        // nothing listens on port 1
        let sink = influx_sink_for("http://127.0.0.1:1".to_string());

        let error = sink.health().await.unwrap_err();
        assert!(matches!(error, SinkError::Unhealthy(_)));
    }
}
