//! HTTP submission of log entries to the ingestion service.

use reqwest::StatusCode;
use shared::models::LogEntry;
use thiserror::Error;

/// Errors produced while submitting one entry.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request never completed.
    #[error("failed to send HTTP request: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with something other than 204 No Content.
    #[error("received unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),
}

/// Sends one entry as a JSON POST to `url`.
///
/// A submission counts as successful only when the service answers with
/// 204 No Content. Any other status is reported as an error and never
/// retried.
///
/// # Errors
///
/// Returns [`SubmitError::Transport`] when the request fails before a
/// response arrives, and [`SubmitError::UnexpectedStatus`] for any response
/// status other than 204.
pub async fn send_entry(
    client: &reqwest::Client,
    url: &str,
    entry: &LogEntry,
) -> Result<(), SubmitError> {
    let response = client.post(url).json(entry).send().await?;

    if response.status() != StatusCode::NO_CONTENT {
        return Err(SubmitError::UnexpectedStatus(response.status()));
    }

    Ok(())
}
