// Fixed-delay retry policy for completion calls
// Author: kelexine (https://github.com/kelexine)

use crate::config::RetryConfig;
use crate::error::{MailError, Result};
use crate::utils::logging::sanitize;
use backoff::backoff::{Backoff, Constant};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded retry with a constant delay between attempts.
///
/// The same operation is re-run unchanged: no exponential growth, no jitter,
/// no change of parameters between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first call included. Zero behaves as one.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: config.delay(),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> Constant {
        Constant::new(self.delay)
    }

    /// Execute `operation` until it succeeds or the attempts run out.
    ///
    /// Every failure is treated as transient. When the last attempt fails the
    /// result is [`MailError::ExhaustedRetries`] carrying the final error text.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.backoff();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", operation_name, attempt);
                    }
                    return Ok(result);
                }
                Err(err) => {
                    let detail = sanitize(&err.to_string());
                    let kind = if err.is_transient() { "remote" } else { "local" };
                    debug!("{} attempt {} failed ({} error)", operation_name, attempt, kind);

                    if attempt >= max_attempts {
                        warn!(
                            "{} failed on final attempt {}/{}: {}",
                            operation_name, attempt, max_attempts, detail
                        );
                        return Err(MailError::ExhaustedRetries {
                            attempts: attempt,
                            last_error: detail,
                        });
                    }

                    let delay = backoff.next_backoff().unwrap_or(self.delay);
                    warn!(
                        "{} failed (attempt {}/{}), retrying after {}ms: {}",
                        operation_name,
                        attempt,
                        max_attempts,
                        delay.as_millis(),
                        detail
                    );

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
