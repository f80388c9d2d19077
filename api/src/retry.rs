//! Bounded retry for point writes.
//!
//! The database write is the only remote call on the ingestion path, and it
//! is retried a fixed number of times with a strictly growing pause between
//! attempts. The policy lives here, with the caller, so that one call on the
//! sink stays exactly one write attempt.

use shared::models::Point;
use shared::sink::{PointSink, SinkError};
use std::time::Duration;

/// Total number of write attempts per point, including the first.
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Pause observed after failed attempt number `attempt` (1-based).
///
/// The waits grow strictly: 1s after the first failure, 2s after the second.
#[must_use]
pub fn delay_after(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt))
}

/// Writes `point` through `sink`, retrying failed attempts.
///
/// Attempts are independent; a failed attempt leaves nothing behind that a
/// later one needs to clean up. After the final failure the error is
/// returned immediately, without a pause.
///
/// # Errors
///
/// Returns the last write error once all attempts are exhausted.
pub async fn write_with_retry(sink: &dyn PointSink, point: Point) -> Result<(), SinkError> {
    let mut attempt = 1;
    loop {
        match sink.write_point(point.clone()).await {
            Ok(()) => return Ok(()),
            Err(error) if attempt < MAX_WRITE_ATTEMPTS => {
                tracing::warn!(
                    attempt = attempt,
                    error = %error,
                    "Point write failed, retrying"
                );
                tokio::time::sleep(delay_after(attempt)).await;
                attempt += 1;
            }
            Err(error) => {
                tracing::error!(
                    attempts = attempt,
                    error = %error,
                    "Point write failed, giving up"
                );
                return Err(error);
            }
        }
    }
}
