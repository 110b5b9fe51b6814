//! Pubsub abstraction over AWS SQS and SNS
//!
//! This crate provides queue, topic and subscription handles for publishing
//! messages and consuming them with per-message success/failure outcomes.
//! Consumption pulls one batch, dispatches each message to a caller-supplied
//! handler concurrently, and acknowledges every message independently: a
//! successful or permanently failed message is deleted, a retryable failure
//! has its visibility timeout shortened so the queue redelivers it sooner.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Amazon Resource Name parsing
pub mod arn;
/// Client construction and queue/topic/subscription provisioning
pub mod client;
/// Consumer configuration
pub mod config;
/// Message body envelopes and decoding
pub mod envelope;
/// Message handler contract
pub mod handler;
/// Queue handle and message consumption
pub mod queue;
/// Subscription handle
pub mod subscription;
/// Topic handle
pub mod topic;

pub use arn::{Arn, ArnError};
pub use client::{ClientError, ClientResult, PubsubClient};
pub use config::ConsumerConfig;
pub use envelope::{DecodeError, Envelope, S3Event, S3EventRecord, SnsEvent};
pub use handler::{BoxError, Handler, HandlerError, HandlerResult};
pub use queue::{
    resolve_outcome, AckAction, ConsumeError, Queue, QueueError, QueueResult, QueueTransport,
    ReceivedMessage, SqsTransport,
};
pub use subscription::Subscription;
pub use topic::{Topic, TopicError};
