//! Timeout wrapper for fallible async operations

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout as tokio_timeout;

/// Run `operation`, failing with [`TimeoutError::Timeout`] after `duration`.
///
/// The operation's own error is kept in [`TimeoutError::OperationFailed`].
pub async fn with_timeout<F, T, E>(
    duration: Duration,
    operation: F,
) -> std::result::Result<T, TimeoutError<E>>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    match tokio_timeout(duration, operation).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(error)) => Err(TimeoutError::OperationFailed(error)),
        Err(_elapsed) => Err(TimeoutError::Timeout(duration)),
    }
}

/// Error type for [`with_timeout`]
#[derive(Debug, Error)]
pub enum TimeoutError<E> {
    /// Operation completed but failed
    #[error("Operation failed: {0}")]
    OperationFailed(#[source] E),

    /// Operation did not complete in time
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl<E> TimeoutError<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TimeoutError::Timeout(_))
    }

    /// Collapse into the operation's error type.
    pub fn into_inner_or(self, on_timeout: impl FnOnce(Duration) -> E) -> E {
        match self {
            TimeoutError::OperationFailed(e) => e,
            TimeoutError::Timeout(d) => on_timeout(d),
        }
    }
}
