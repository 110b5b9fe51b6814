//! Test doubles for driving the consumer without a live queue service.

#![allow(dead_code)]

use async_trait::async_trait;
use pubsub::{ConsumerConfig, Queue, QueueError, QueueTransport, ReceivedMessage};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One acknowledgment call issued by the consumer, by receipt handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckCall {
    /// The message was deleted.
    Delete(String),
    /// The message's visibility timeout was set to the given seconds.
    ExtendDelay(String, i32),
}

/// In-memory transport that serves scripted batches and records every
/// acknowledgment call.
#[derive(Default)]
pub struct FakeTransport {
    batches: Mutex<VecDeque<Vec<ReceivedMessage>>>,
    acks: Mutex<Vec<AckCall>>,
    fail_receive: bool,
    fail_delete_receipts: Vec<String>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that serves a single batch, then empty batches.
    pub fn with_batch(batch: Vec<ReceivedMessage>) -> Self {
        let transport = Self::default();
        transport.batches.lock().unwrap().push_back(batch);
        transport
    }

    /// Transport whose receive call always fails.
    pub fn failing_receive() -> Self {
        Self {
            fail_receive: true,
            ..Self::default()
        }
    }

    /// Makes delete calls fail for the given receipt handle.
    pub fn fail_delete_of(mut self, receipt_handle: &str) -> Self {
        self.fail_delete_receipts.push(receipt_handle.to_string());
        self
    }

    /// Acknowledgment calls recorded so far, in issue order.
    pub fn acks(&self) -> Vec<AckCall> {
        self.acks.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueTransport for FakeTransport {
    async fn receive(
        &self,
        _queue_url: &str,
        _max_messages: i32,
        _wait_time_seconds: i32,
    ) -> Result<Vec<ReceivedMessage>, QueueError> {
        if self.fail_receive {
            return Err(QueueError::Transport("receive unavailable".into()));
        }

        Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn delete(&self, _queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        if self
            .fail_delete_receipts
            .iter()
            .any(|receipt| receipt == receipt_handle)
        {
            return Err(QueueError::Transport("delete unavailable".into()));
        }

        self.acks
            .lock()
            .unwrap()
            .push(AckCall::Delete(receipt_handle.to_string()));
        Ok(())
    }

    async fn change_visibility(
        &self,
        _queue_url: &str,
        receipt_handle: &str,
        visibility_timeout: i32,
    ) -> Result<(), QueueError> {
        self.acks.lock().unwrap().push(AckCall::ExtendDelay(
            receipt_handle.to_string(),
            visibility_timeout,
        ));
        Ok(())
    }

    async fn send(
        &self,
        _queue_url: &str,
        _body: &str,
        _attributes: HashMap<String, String>,
    ) -> Result<String, QueueError> {
        Ok("fake-message-id".to_string())
    }

    async fn queue_attributes(
        &self,
        _queue_url: &str,
    ) -> Result<HashMap<String, String>, QueueError> {
        Ok(HashMap::new())
    }

    async fn set_queue_attributes(
        &self,
        _queue_url: &str,
        _attributes: HashMap<String, String>,
    ) -> Result<(), QueueError> {
        Ok(())
    }
}

/// Builds a received message whose receipt handle is derived from its id.
pub fn message(message_id: &str, body: &str) -> ReceivedMessage {
    ReceivedMessage {
        message_id: message_id.to_string(),
        body: body.to_string(),
        attributes: HashMap::new(),
        receipt_handle: receipt(message_id),
    }
}

/// The receipt handle [`message`] assigns for a message id.
pub fn receipt(message_id: &str) -> String {
    format!("receipt-{message_id}")
}

/// Requeue visibility timeout used by [`test_queue`].
pub const REQUEUE_TIMEOUT: i32 = 15;

/// Builds a queue handle over the given transport with test configuration.
pub fn test_queue(transport: Arc<FakeTransport>) -> Queue {
    Queue::new(
        transport,
        "arn:aws:sqs:us-east-1:123456789012:orders"
            .parse()
            .expect("valid test queue ARN"),
        "http://localhost:4566/123456789012/orders",
        ConsumerConfig {
            max_messages: 10,
            wait_time_seconds: 0,
            requeue_visibility_timeout: REQUEUE_TIMEOUT,
        },
    )
}
