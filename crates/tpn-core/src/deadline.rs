//! Run an operation against a deadline.
//!
//! The operation and a `tokio::time` timer race; whichever finishes first
//! decides the outcome. The operation gets an [`AbortSignal`] it must pass to
//! blocking I/O so an in-flight transfer stops once the deadline fires.

use crate::error::ApiError;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cloneable, read-only view of an [`AbortController`].
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }
}

/// Owns the abort flag for one call. Dropping the controller aborts, so the
/// flag is raised on every exit path (timeout, caller cancellation, panic).
#[derive(Debug, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    pub fn abort(&self) {
        self.signal.aborted.store(true, Ordering::Release);
    }
}

impl Drop for AbortController {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Runs `op` with a fresh abort signal, failing with [`ApiError::Timeout`] if
/// it has not completed within `timeout`.
///
/// When the timer wins the operation future is dropped and the signal is
/// raised. When the operation wins the timer is dropped.
pub async fn run_with_deadline<T, F, Fut>(timeout: Duration, op: F) -> Result<T, ApiError>
where
    F: FnOnce(AbortSignal) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let controller = AbortController::new();
    match tokio::time::timeout(timeout, op(controller.signal())).await {
        Ok(result) => result,
        Err(_) => {
            controller.abort();
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "deadline elapsed");
            Err(ApiError::Timeout)
        }
    }
}
