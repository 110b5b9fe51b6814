//! The contract callers implement to process consumed messages.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Boxed error with the bounds required to cross task boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of handling one message.
pub type HandlerResult = Result<(), HandlerError>;

/// Handler failure, classified by whether the message is worth retrying.
///
/// A retryable failure puts the message back within the requeue visibility
/// timeout; the queue's own redrive policy dead-letters it once its receive
/// count is exhausted. A terminal failure deletes the message outright, so
/// input that can never succeed must be classified terminal or it is
/// redelivered until the queue gives up on it.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct HandlerError {
    retryable: bool,
    source: BoxError,
}

impl HandlerError {
    /// Failure worth retrying, e.g. a dependency being briefly unavailable.
    pub fn retryable(source: impl Into<BoxError>) -> Self {
        Self {
            retryable: true,
            source: source.into(),
        }
    }

    /// Failure that cannot succeed on redelivery, e.g. invalid input.
    pub fn terminal(source: impl Into<BoxError>) -> Self {
        Self {
            retryable: false,
            source: source.into(),
        }
    }

    /// Whether the message should be redelivered.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }
}

/// Processes one decoded message.
///
/// The consumer invokes the handler once per received message, concurrently
/// across the batch. `shutdown` is the consume call's cancellation signal;
/// handlers performing slow work should stop promptly once it fires. The
/// message is acknowledged from the returned result alone, so a handler must
/// not delete or requeue queue messages itself.
#[async_trait]
pub trait Handler<T>: Send + Sync {
    /// Handles one message, classifying any failure via [`HandlerError`].
    async fn handle(&self, message: T, shutdown: &CancellationToken) -> HandlerResult
    where
        T: 'async_trait;
}

#[async_trait]
impl<T, H> Handler<T> for Arc<H>
where
    T: Send + 'static,
    H: Handler<T> + ?Sized,
{
    async fn handle(&self, message: T, shutdown: &CancellationToken) -> HandlerResult {
        (**self).handle(message, shutdown).await
    }
}
