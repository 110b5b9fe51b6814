use aws_sdk_sqs::error::SdkError;
use aws_sdk_sqs::operation::change_message_visibility::ChangeMessageVisibilityError;
use aws_sdk_sqs::operation::delete_message::DeleteMessageError;
use aws_sdk_sqs::operation::get_queue_attributes::GetQueueAttributesError;
use aws_sdk_sqs::operation::receive_message::ReceiveMessageError;
use aws_sdk_sqs::operation::send_message::SendMessageError;
use aws_sdk_sqs::operation::set_queue_attributes::SetQueueAttributesError;
use thiserror::Error;

use crate::envelope::DecodeError;
use crate::handler::{BoxError, HandlerError};

/// Result type alias for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Error types for queue transport operations
#[derive(Error, Debug)]
pub enum QueueError {
    /// Error receiving messages from SQS
    #[error("Failed to receive messages from SQS")]
    Receive(#[from] SdkError<ReceiveMessageError>),

    /// Error sending a message to SQS
    #[error("Failed to send message to SQS")]
    Send(#[from] SdkError<SendMessageError>),

    /// Error deleting a message from SQS
    #[error("Failed to delete message from SQS")]
    Delete(#[from] SdkError<DeleteMessageError>),

    /// Error changing a message's visibility timeout in SQS
    #[error("Failed to change message visibility in SQS")]
    ChangeVisibility(#[from] SdkError<ChangeMessageVisibilityError>),

    /// Error reading queue attributes from SQS
    #[error("Failed to read queue attributes from SQS")]
    GetAttributes(#[from] SdkError<GetQueueAttributesError>),

    /// Error setting queue attributes in SQS
    #[error("Failed to set queue attributes in SQS")]
    SetAttributes(#[from] SdkError<SetQueueAttributesError>),

    /// A message attribute could not be built
    #[error("Invalid message attribute")]
    InvalidAttribute(#[from] aws_sdk_sqs::error::BuildError),

    /// Failure from a transport not backed by SQS
    #[error("Queue transport failed")]
    Transport(#[source] BoxError),
}

/// Error returned by one consume call.
///
/// Per-message failures never abort sibling processing; the consumer
/// acknowledges every message in the batch and then reports the first
/// failure it joined.
#[derive(Error, Debug)]
pub enum ConsumeError {
    /// The receive call itself failed; no messages were processed.
    #[error("Failed to receive messages")]
    Receive(#[source] QueueError),

    /// A message body could not be decoded into the expected envelope. The
    /// message was requeued for retry.
    #[error("Failed to decode message {message_id}")]
    Decode {
        /// Id of the affected message.
        message_id: String,
        /// The decode failure.
        #[source]
        source: DecodeError,
    },

    /// The handler reported a failure. The message was acknowledged
    /// according to the failure's classification.
    #[error("Handler failed for message {message_id}")]
    Handler {
        /// Id of the affected message.
        message_id: String,
        /// The handler failure.
        #[source]
        source: HandlerError,
    },

    /// The delete or change-visibility call for a message failed. The
    /// message stays invisible until its original visibility timeout
    /// expires, then is redelivered.
    #[error("Failed to acknowledge message {message_id}")]
    Ack {
        /// Id of the affected message.
        message_id: String,
        /// The transport failure.
        #[source]
        source: QueueError,
    },

    /// A per-message task ended before completing its acknowledgment.
    #[error("Message task ended before acknowledgment")]
    Task(#[source] tokio::task::JoinError),
}
