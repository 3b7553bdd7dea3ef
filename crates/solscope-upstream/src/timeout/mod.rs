//! Timeout wrapper for upstream calls.

use solscope_core::SolscopeError;
use std::time::Duration;

/// Wraps an async operation with a timeout.
///
/// When the bound elapses the inner future is dropped, which cancels any
/// in-progress transport work, and `SolscopeError::Timeout` is returned.
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> Result<T, SolscopeError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, SolscopeError>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| SolscopeError::Timeout(duration))?
}
