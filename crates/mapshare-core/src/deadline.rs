// ── Operations with a deadline ──

use std::future::Future;
use std::time::Duration;

use crate::error::CoreError;

/// Run `fut` to completion unless `limit` elapses first.
///
/// On expiry the future is dropped (cancelled at its current suspension
/// point) and [`CoreError::Timeout`] is returned.
pub async fn with_deadline<F: Future>(limit: Duration, fut: F) -> Result<F::Output, CoreError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| CoreError::Timeout {
            timeout_secs: limit.as_secs(),
        })
}
