//! The queue service boundary.
//!
//! [`QueueTransport`] captures the calls a queue handle makes against the
//! owning service, keyed by queue URL and free of provider types, so the
//! consumer can be driven by an in-memory double in tests. [`SqsTransport`]
//! is the production implementation over the AWS SQS client.

use async_trait::async_trait;
use aws_sdk_sqs::types::{MessageAttributeValue, QueueAttributeName};
use aws_sdk_sqs::Client as SqsClient;
use std::collections::HashMap;

use crate::queue::error::QueueResult;

/// One delivery pulled from a queue.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Service-assigned message id.
    pub message_id: String,
    /// Raw message body.
    pub body: String,
    /// String-valued message attributes.
    pub attributes: HashMap<String, String>,
    /// Opaque handle identifying this delivery; required to delete the
    /// message or extend its delay.
    pub receipt_handle: String,
}

/// Queue service calls a queue handle relies on.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Pulls up to `max_messages` messages, long-polling for
    /// `wait_time_seconds`. Returns an empty batch when no message arrives
    /// within the wait window.
    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> QueueResult<Vec<ReceivedMessage>>;

    /// Deletes one delivery by receipt handle.
    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> QueueResult<()>;

    /// Sets one delivery's remaining visibility timeout, in seconds.
    async fn change_visibility(
        &self,
        queue_url: &str,
        receipt_handle: &str,
        visibility_timeout: i32,
    ) -> QueueResult<()>;

    /// Sends a message, returning its service-assigned id.
    async fn send(
        &self,
        queue_url: &str,
        body: &str,
        attributes: HashMap<String, String>,
    ) -> QueueResult<String>;

    /// Reads all queue attributes.
    async fn queue_attributes(&self, queue_url: &str) -> QueueResult<HashMap<String, String>>;

    /// Sets queue attributes.
    async fn set_queue_attributes(
        &self,
        queue_url: &str,
        attributes: HashMap<String, String>,
    ) -> QueueResult<()>;
}

/// [`QueueTransport`] backed by the AWS SQS client.
#[derive(Clone)]
pub struct SqsTransport {
    client: SqsClient,
}

impl SqsTransport {
    /// Wraps a pre-configured SQS client.
    #[must_use]
    pub const fn new(client: SqsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueueTransport for SqsTransport {
    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> QueueResult<Vec<ReceivedMessage>> {
        let result = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_time_seconds)
            .message_attribute_names("All")
            .send()
            .await?;

        // Messages missing a body, id or receipt handle cannot be processed
        // or acknowledged; they are redelivered after the visibility timeout.
        let messages = result
            .messages()
            .iter()
            .filter_map(|msg| {
                let body = msg.body()?.to_string();
                let message_id = msg.message_id()?.to_string();
                let receipt_handle = msg.receipt_handle()?.to_string();

                let attributes = msg
                    .message_attributes()
                    .map(|attrs| {
                        attrs
                            .iter()
                            .filter_map(|(name, value)| {
                                value.string_value().map(|v| (name.clone(), v.to_string()))
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                Some(ReceivedMessage {
                    message_id,
                    body,
                    attributes,
                    receipt_handle,
                })
            })
            .collect();

        Ok(messages)
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> QueueResult<()> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }

    async fn change_visibility(
        &self,
        queue_url: &str,
        receipt_handle: &str,
        visibility_timeout: i32,
    ) -> QueueResult<()> {
        self.client
            .change_message_visibility()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .visibility_timeout(visibility_timeout)
            .send()
            .await?;

        Ok(())
    }

    async fn send(
        &self,
        queue_url: &str,
        body: &str,
        attributes: HashMap<String, String>,
    ) -> QueueResult<String> {
        let attributes = attributes
            .into_iter()
            .map(|(name, value)| {
                MessageAttributeValue::builder()
                    .data_type("String")
                    .string_value(value)
                    .build()
                    .map(|attr| (name, attr))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        let result = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .set_message_attributes((!attributes.is_empty()).then_some(attributes))
            .send()
            .await?;

        Ok(result
            .message_id()
            .map(std::string::ToString::to_string)
            .unwrap_or_default())
    }

    async fn queue_attributes(&self, queue_url: &str) -> QueueResult<HashMap<String, String>> {
        let result = self
            .client
            .get_queue_attributes()
            .queue_url(queue_url)
            .attribute_names(QueueAttributeName::All)
            .send()
            .await?;

        Ok(result
            .attributes()
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(name, value)| (name.as_str().to_string(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_queue_attributes(
        &self,
        queue_url: &str,
        attributes: HashMap<String, String>,
    ) -> QueueResult<()> {
        self.client
            .set_queue_attributes()
            .queue_url(queue_url)
            .set_attributes(Some(
                attributes
                    .into_iter()
                    .map(|(name, value)| (QueueAttributeName::from(name.as_str()), value))
                    .collect(),
            ))
            .send()
            .await?;

        Ok(())
    }
}
