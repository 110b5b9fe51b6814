//! The message consumption engine.
//!
//! One consume call pulls a single batch, spawns an independent task per
//! message, and joins them all before returning. Each task runs decode →
//! handle → resolve → acknowledge strictly in order and owns its message
//! exclusively, so no failure, delay or panic in one task can keep a sibling
//! from acknowledging its own message. Acknowledgment is never retried here:
//! a failed delete or visibility change leaves the message to the queue's
//! own redelivery, an acceptable at-least-once duplicate.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::envelope::Envelope;
use crate::handler::Handler;
use crate::queue::error::ConsumeError;
use crate::queue::transport::{QueueTransport, ReceivedMessage};
use crate::queue::Queue;
use crate::HandlerResult;

/// Post-handler acknowledgment action for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckAction {
    /// Remove the message from the queue.
    Delete,
    /// Shorten the message's visibility timeout so it is redelivered sooner.
    ExtendDelay,
}

/// Maps a handler outcome to its acknowledgment action.
///
/// Success always deletes, regardless of how a failure would have been
/// classified. A retryable failure extends the message's delay and leaves
/// redelivery counting to the queue's own redrive policy. A terminal failure
/// deletes the message outright rather than letting it cycle until the
/// queue's receive limit discards it.
#[must_use]
pub fn resolve_outcome(outcome: &HandlerResult) -> AckAction {
    match outcome {
        Ok(()) => AckAction::Delete,
        Err(err) if err.is_retryable() => AckAction::ExtendDelay,
        Err(_) => AckAction::Delete,
    }
}

pub(super) async fn consume_batch<T, H>(
    queue: &Queue,
    handler: H,
    shutdown: &CancellationToken,
) -> Result<(), ConsumeError>
where
    T: Envelope + Send + 'static,
    H: Handler<T> + 'static,
{
    let messages = queue
        .transport
        .receive(
            &queue.url,
            queue.config.max_messages,
            queue.config.wait_time_seconds,
        )
        .await
        .map_err(ConsumeError::Receive)?;

    if messages.is_empty() {
        return Ok(());
    }

    tracing::debug!(
        "Received {} messages from {}",
        messages.len(),
        queue.arn.resource()
    );

    let handler = Arc::new(handler);
    let mut tasks = JoinSet::new();
    for message in messages {
        // Messages not yet dispatched are left to the visibility timeout;
        // tasks already running complete their acknowledgment.
        if shutdown.is_cancelled() {
            tracing::debug!("Shutdown requested, leaving remaining messages to redelivery");
            break;
        }

        tasks.spawn(process_message::<T, H>(
            Arc::clone(&queue.transport),
            queue.url.clone(),
            queue.config.requeue_visibility_timeout,
            Arc::clone(&handler),
            shutdown.clone(),
            message,
        ));
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap_or_else(|err| Err(ConsumeError::Task(err)));
        if let Err(err) = result {
            if first_error.is_none() {
                first_error = Some(err);
            }
        }
    }

    first_error.map_or(Ok(()), Err)
}

async fn process_message<T, H>(
    transport: Arc<dyn QueueTransport>,
    queue_url: String,
    requeue_visibility_timeout: i32,
    handler: Arc<H>,
    shutdown: CancellationToken,
    message: ReceivedMessage,
) -> Result<(), ConsumeError>
where
    T: Envelope + Send + 'static,
    H: Handler<T> + 'static,
{
    let payload = match T::decode(&message.body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(
                "Failed to decode message {}: {} - body: {}",
                message.message_id,
                err,
                message.body
            );

            // A malformed body is requeued for inspection and retry, never
            // silently dropped; the queue's redrive policy dead-letters it
            // once its receive count runs out.
            transport
                .change_visibility(&queue_url, &message.receipt_handle, requeue_visibility_timeout)
                .await
                .map_err(|source| ConsumeError::Ack {
                    message_id: message.message_id.clone(),
                    source,
                })?;

            return Err(ConsumeError::Decode {
                message_id: message.message_id,
                source: err,
            });
        }
    };

    let outcome = handler.handle(payload, &shutdown).await;

    match resolve_outcome(&outcome) {
        AckAction::Delete => transport.delete(&queue_url, &message.receipt_handle).await,
        AckAction::ExtendDelay => {
            transport
                .change_visibility(&queue_url, &message.receipt_handle, requeue_visibility_timeout)
                .await
        }
    }
    .map_err(|source| ConsumeError::Ack {
        message_id: message.message_id.clone(),
        source,
    })?;

    outcome.map_err(|source| ConsumeError::Handler {
        message_id: message.message_id,
        source,
    })
}
