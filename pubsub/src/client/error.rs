use aws_sdk_sns::operation::create_topic::CreateTopicError;
use aws_sdk_sns::operation::get_subscription_attributes::GetSubscriptionAttributesError;
use aws_sdk_sns::operation::get_topic_attributes::GetTopicAttributesError;
use aws_sdk_sns::operation::list_subscriptions_by_topic::ListSubscriptionsByTopicError;
use aws_sdk_sns::operation::subscribe::SubscribeError;
use aws_sdk_sqs::error::SdkError;
use aws_sdk_sqs::operation::create_queue::CreateQueueError;
use aws_sdk_sqs::operation::get_queue_attributes::GetQueueAttributesError;
use aws_sdk_sqs::operation::get_queue_url::GetQueueUrlError;
use thiserror::Error;

use crate::arn::ArnError;

/// Result type alias for provisioning and lookup operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types for provisioning and lookup operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// A queue, topic or subscription identifier could not be parsed
    #[error("Invalid resource name")]
    Arn(#[from] ArnError),

    /// Error looking up a queue URL in SQS
    #[error("Failed to look up queue URL in SQS")]
    GetQueueUrl(#[from] SdkError<GetQueueUrlError>),

    /// Error creating a queue in SQS
    #[error("Failed to create queue in SQS")]
    CreateQueue(#[from] SdkError<CreateQueueError>),

    /// Error reading queue attributes from SQS
    #[error("Failed to read queue attributes from SQS")]
    GetQueueAttributes(#[from] SdkError<GetQueueAttributesError>),

    /// Error creating a topic in SNS
    #[error("Failed to create topic in SNS")]
    CreateTopic(#[from] SdkError<CreateTopicError>),

    /// Error reading topic attributes from SNS
    #[error("Failed to read topic attributes from SNS")]
    GetTopicAttributes(#[from] SdkError<GetTopicAttributesError>),

    /// Error reading subscription attributes from SNS
    #[error("Failed to read subscription attributes from SNS")]
    GetSubscriptionAttributes(#[from] SdkError<GetSubscriptionAttributesError>),

    /// Error listing a topic's subscriptions in SNS
    #[error("Failed to list topic subscriptions in SNS")]
    ListSubscriptions(#[from] SdkError<ListSubscriptionsByTopicError>),

    /// Error creating a subscription in SNS
    #[error("Failed to create subscription in SNS")]
    Subscribe(#[from] SdkError<SubscribeError>),

    /// Error serializing the redrive policy for a dead-letter queue
    #[error("Failed to serialize redrive policy")]
    RedrivePolicy(#[from] serde_json::Error),

    /// The service response was missing a field the client needs
    #[error("Required field `{0}` missing from service response")]
    MissingResponseField(&'static str),

    /// No SQS subscription with the given ARN exists on its topic
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),
}
