//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::sink::{InMemorySink, PointSink};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// This struct contains the shared resources needed by the API, currently
/// just the sink that point writes go through.
#[derive(Clone)]
pub struct AppState {
    /// The time-series sink backend.
    sink: Arc<dyn PointSink>,
}

impl AppState {
    /// Creates a new application state with the given sink.
    pub fn new(sink: Arc<dyn PointSink>) -> Self {
        Self { sink }
    }

    /// Creates a new application state with an in-memory sink.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_sink() -> Self {
        Self {
            sink: Arc::new(InMemorySink::new()),
        }
    }

    /// Returns a reference to the sink.
    #[must_use]
    pub fn sink(&self) -> &dyn PointSink {
        self.sink.as_ref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_sink()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::LogEntry;
    use shared::sink::InMemorySink;

    #[tokio::test]
    async fn test_app_state_with_injected_sink() {
        let sink = InMemorySink::new_shared();
        let state = AppState::new(sink.clone());

        let point = LogEntry::new("test-service", "/api/test").to_point(Utc::now());
        state.sink().write_point(point).await.unwrap();

        assert_eq!(sink.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_app_state_is_clone() {
        let sink = InMemorySink::new_shared();
        let state = AppState::new(sink.clone());
        let state2 = state.clone();

        // Both should share the same sink
        let point = LogEntry::new("test-service", "/api/test").to_point(Utc::now());
        state.sink().write_point(point).await.unwrap();

        let other = LogEntry::new("other-service", "/api/other").to_point(Utc::now());
        state2.sink().write_point(other).await.unwrap();

        assert_eq!(sink.count().unwrap(), 2);
    }
}
