//! Topic handle for publish-side operations.

use aws_sdk_sns::error::SdkError;
use aws_sdk_sns::operation::get_topic_attributes::GetTopicAttributesError;
use aws_sdk_sns::operation::publish::PublishError;
use aws_sdk_sns::types::MessageAttributeValue;
use aws_sdk_sns::Client as SnsClient;
use std::collections::HashMap;
use thiserror::Error;

use crate::arn::Arn;

/// Error types for topic operations
#[derive(Error, Debug)]
pub enum TopicError {
    /// Error publishing a message to SNS
    #[error("Failed to publish message to SNS")]
    Publish(#[from] SdkError<PublishError>),

    /// Error reading topic attributes from SNS
    #[error("Failed to read topic attributes from SNS")]
    GetAttributes(#[from] SdkError<GetTopicAttributesError>),

    /// A message attribute could not be built
    #[error("Invalid message attribute")]
    InvalidAttribute(#[from] aws_sdk_sns::error::BuildError),
}

/// Handle to one topic.
#[derive(Clone)]
pub struct Topic {
    sns: SnsClient,
    arn: Arn,
}

impl Topic {
    pub(crate) const fn new(sns: SnsClient, arn: Arn) -> Self {
        Self { sns, arn }
    }

    /// The topic name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.arn.resource()
    }

    /// The topic ARN.
    #[must_use]
    pub const fn arn(&self) -> &Arn {
        &self.arn
    }

    /// Publishes a message to the topic, fanning it out to every
    /// subscription.
    ///
    /// # Returns
    ///
    /// The service-assigned message id.
    ///
    /// # Errors
    ///
    /// Returns `TopicError` if the publish operation fails.
    pub async fn publish(
        &self,
        body: &str,
        attributes: HashMap<String, String>,
    ) -> Result<String, TopicError> {
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
            .sns
            .publish()
            .topic_arn(self.arn.to_string())
            .message(body)
            .set_message_attributes((!attributes.is_empty()).then_some(attributes))
            .send()
            .await?;

        let message_id = result
            .message_id()
            .map(std::string::ToString::to_string)
            .unwrap_or_default();
        tracing::debug!("Published message {} to {}", message_id, self.arn.resource());

        Ok(message_id)
    }

    /// Reads all topic attributes.
    ///
    /// # Errors
    ///
    /// Returns `TopicError` if the attributes cannot be read.
    pub async fn attributes(&self) -> Result<HashMap<String, String>, TopicError> {
        let result = self
            .sns
            .get_topic_attributes()
            .topic_arn(self.arn.to_string())
            .send()
            .await?;

        Ok(result.attributes().cloned().unwrap_or_default())
    }
}
