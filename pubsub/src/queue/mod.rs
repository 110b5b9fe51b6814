//! Queue handle and message consumption.
//!
//! A [`Queue`] is a cheap, cloneable handle to one queue: it can send
//! messages and consume them with per-message acknowledgment. Consumption
//! comes in three flavors that differ only in how the body is decoded before
//! reaching the handler: raw text, an SNS notification envelope, or an S3
//! event notification.

mod consumer;
/// Error types for queue operations
pub mod error;
mod transport;

pub use consumer::{resolve_outcome, AckAction};
pub use error::{ConsumeError, QueueError, QueueResult};
pub use transport::{QueueTransport, ReceivedMessage, SqsTransport};

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::arn::Arn;
use crate::config::ConsumerConfig;
use crate::envelope::{S3Event, SnsEvent};
use crate::handler::Handler;

/// Handle to one queue.
#[derive(Clone)]
pub struct Queue {
    transport: Arc<dyn QueueTransport>,
    arn: Arn,
    url: String,
    config: ConsumerConfig,
}

impl Queue {
    /// Creates a queue handle over the given transport.
    ///
    /// Handles for real queues come from [`crate::PubsubClient`]; this
    /// constructor is the seam for custom transports and test doubles.
    #[must_use]
    pub fn new(
        transport: Arc<dyn QueueTransport>,
        arn: Arn,
        url: impl Into<String>,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            transport,
            arn,
            url: url.into(),
            config,
        }
    }

    /// The queue name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.arn.resource()
    }

    /// The queue ARN.
    #[must_use]
    pub const fn arn(&self) -> &Arn {
        &self.arn
    }

    /// The queue URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns whether the queue is reachable.
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the queue's attributes cannot be read.
    pub async fn exists(&self) -> QueueResult<bool> {
        self.transport.queue_attributes(&self.url).await?;

        Ok(true)
    }

    /// Sends a message to the queue.
    ///
    /// # Returns
    ///
    /// The service-assigned message id.
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the send operation fails.
    pub async fn send(
        &self,
        body: &str,
        attributes: HashMap<String, String>,
    ) -> QueueResult<String> {
        let message_id = self.transport.send(&self.url, body, attributes).await?;
        tracing::debug!("Sent message {} to {}", message_id, self.arn.resource());

        Ok(message_id)
    }

    /// Reads all queue attributes.
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the attributes cannot be read.
    pub async fn attributes(&self) -> QueueResult<HashMap<String, String>> {
        self.transport.queue_attributes(&self.url).await
    }

    /// Sets queue attributes.
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the attributes cannot be set.
    pub async fn set_attributes(&self, attributes: HashMap<String, String>) -> QueueResult<()> {
        self.transport.set_queue_attributes(&self.url, attributes).await
    }

    /// Consumes one batch, passing each raw message body to the handler.
    ///
    /// Pulls at most `max_messages` messages in a single receive call and
    /// processes them concurrently; an empty batch is a successful no-op.
    /// Every message is acknowledged from its own outcome regardless of the
    /// others. `shutdown` stops further messages of the batch from being
    /// dispatched; messages already dispatched complete their
    /// acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns `ConsumeError` if the receive call fails, or the first
    /// per-message failure once the whole batch has been acknowledged.
    pub async fn consume<H>(
        &self,
        handler: H,
        shutdown: &CancellationToken,
    ) -> Result<(), ConsumeError>
    where
        H: Handler<String> + 'static,
    {
        consumer::consume_batch::<String, H>(self, handler, shutdown).await
    }

    /// Consumes one batch of SNS notifications.
    ///
    /// Same contract as [`Queue::consume`], with each body decoded into an
    /// [`SnsEvent`] first. A body that is not a valid notification is
    /// requeued for retry and reported, never silently dropped.
    ///
    /// # Errors
    ///
    /// Returns `ConsumeError` if the receive call fails, or the first
    /// per-message failure once the whole batch has been acknowledged.
    pub async fn consume_sns<H>(
        &self,
        handler: H,
        shutdown: &CancellationToken,
    ) -> Result<(), ConsumeError>
    where
        H: Handler<SnsEvent> + 'static,
    {
        consumer::consume_batch::<SnsEvent, H>(self, handler, shutdown).await
    }

    /// Consumes one batch of S3 event notifications.
    ///
    /// Same contract as [`Queue::consume`], with each body decoded into an
    /// [`S3Event`] first. A body that is not a valid event notification is
    /// requeued for retry and reported, never silently dropped.
    ///
    /// # Errors
    ///
    /// Returns `ConsumeError` if the receive call fails, or the first
    /// per-message failure once the whole batch has been acknowledged.
    pub async fn consume_s3_events<H>(
        &self,
        handler: H,
        shutdown: &CancellationToken,
    ) -> Result<(), ConsumeError>
    where
        H: Handler<S3Event> + 'static,
    {
        consumer::consume_batch::<S3Event, H>(self, handler, shutdown).await
    }
}
