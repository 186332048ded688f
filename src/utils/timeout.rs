// Wall-clock deadline around a whole completion cycle
// Author: kelexine (https://github.com/kelexine)

use crate::error::{MailError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Run `future` on a worker task and stop waiting for it after `limit`.
///
/// Cancellation is advisory: on timeout the worker keeps running until it
/// finishes on its own, only the caller gives up. A worker that panics is
/// reported as [`MailError::Internal`].
pub async fn with_timeout<F, T>(limit: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let worker = tokio::spawn(future);

    match tokio::time::timeout(limit, worker).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(MailError::Internal(format!(
            "Completion worker failed: {}",
            join_err
        ))),
        Err(_) => {
            warn!("Completion did not finish within {}s", limit.as_secs());
            Err(MailError::Timeout(limit))
        }
    }
}
