//! Log ingestion endpoint.
//!
//! Accepts a single log entry per request, validates it, converts it to a
//! time-series point stamped with the server's receipt time, and writes it
//! through the configured sink with bounded retry.

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::models::LogEntry;

use crate::retry;
use crate::state::AppState;

/// Error response for rejected or failed ingestion.
///
/// Status codes are the contract; this body exists for humans reading
/// client logs or curl output.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestError {
    /// Error type.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

/// Creates the log ingestion routes.
pub fn ingest_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(ingest_entry))
        .layer(DefaultBodyLimit::max(crate::MAX_BODY_BYTES))
        .with_state(state)
}

/// Handler for log ingestion.
///
/// Returns 204 No Content once the entry has been written to the database.
/// Undecodable or invalid entries yield 400 before any write attempt; a
/// write that still fails after all retries yields 500.
async fn ingest_entry(
    State(state): State<AppState>,
    payload: Result<Json<LogEntry>, JsonRejection>,
) -> Result<StatusCode, (StatusCode, Json<IngestError>)> {
    // Handle JSON parsing errors, including bodies over the size cap
    let Json(entry) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected undecodable request body");
        (
            StatusCode::BAD_REQUEST,
            Json(IngestError {
                error: "invalid_json".to_string(),
                message: rejection.body_text(),
            }),
        )
    })?;

    entry.validate_entry().map_err(|e| {
        tracing::warn!(error = %e, "Rejected invalid log entry");
        (
            StatusCode::BAD_REQUEST,
            Json(IngestError {
                error: "validation_failed".to_string(),
                message: e.to_string(),
            }),
        )
    })?;

    // The point carries the server's receipt time, not anything client-supplied
    let point = entry.to_point(Utc::now());

    retry::write_with_retry(state.sink(), point)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(IngestError {
                    error: "write_failed".to_string(),
                    message: e.to_string(),
                }),
            )
        })?;

    tracing::info!(
        service = %entry.service,
        endpoint = %entry.endpoint,
        "Log entry written"
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use shared::sink::InMemorySink;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_router() -> (Router, Arc<InMemorySink>) {
        let sink = InMemorySink::new_shared();
        let router = ingest_routes(AppState::new(sink.clone()));
        (router, sink)
    }

    fn post_entry(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_valid_entry_returns_204_empty() {
        let (app, _sink) = create_test_router();

        let body = r#"{
            "service": "auth-service",
            "endpoint": "/api/login",
            "error": "connection timeout",
            "traceback": "File \"/auth/session.py\", line 42, in refresh"
        }"#;

        let response = app.oneshot(post_entry(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_ingest_writes_point_with_tags_and_fields() {
        let (app, sink) = create_test_router();

        let body = r#"{
            "service": "payment-service",
            "endpoint": "/api/payments",
            "error": "card declined",
            "traceback": ""
        }"#;

        app.oneshot(post_entry(body)).await.unwrap();

        let points = sink.points().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].measurement(), "logs");
        assert_eq!(points[0].tag("service"), Some("payment-service"));
        assert_eq!(points[0].tag("endpoint"), Some("/api/payments"));
        assert_eq!(points[0].field("error"), Some("card declined"));
        assert_eq!(points[0].field("traceback"), Some(""));
    }

    #[tokio::test]
    async fn test_ingest_invalid_json() {
        let (app, sink) = create_test_router();

        let response = app.oneshot(post_entry(r#"{ invalid json }"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let error: IngestError = serde_json::from_slice(&body).unwrap();

        assert_eq!(error.error, "invalid_json");
        assert_eq!(sink.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ingest_empty_service_rejected() {
        let (app, sink) = create_test_router();

        let body = r#"{"service": "", "endpoint": "/api/login"}"#;

        let response = app.oneshot(post_entry(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let error: IngestError = serde_json::from_slice(&body).unwrap();

        assert_eq!(error.error, "validation_failed");
        assert_eq!(sink.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ingest_missing_endpoint_rejected() {
        let (app, sink) = create_test_router();

        // absent field decodes to empty and fails validation
        let body = r#"{"service": "user-service"}"#;

        let response = app.oneshot(post_entry(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(sink.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ingest_allows_empty_diagnostics() {
        let (app, _sink) = create_test_router();

        let body = r#"{"service": "user-service", "endpoint": "/api/users"}"#;

        let response = app.oneshot(post_entry(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_ingest_wrong_method_not_allowed() {
        let (app, _sink) = create_test_router();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_ingest_oversized_body_rejected() {
        let (app, sink) = create_test_router();

        let body = "x".repeat(crate::MAX_BODY_BYTES + 1);

        let response = app.oneshot(post_entry(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(sink.count().unwrap(), 0);
    }
}
