//! Client construction and queue/topic/subscription provisioning.
//!
//! [`PubsubClient`] wraps pre-configured SQS and SNS clients and hands out
//! [`Queue`], [`Topic`] and [`Subscription`] handles, either by looking up
//! existing resources by ARN or by creating them.

/// Error types for provisioning and lookup operations
pub mod error;

pub use error::{ClientError, ClientResult};

use aws_config::BehaviorVersion;
use aws_sdk_sns::Client as SnsClient;
use aws_sdk_sqs::types::QueueAttributeName;
use aws_sdk_sqs::Client as SqsClient;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::arn::Arn;
use crate::config::ConsumerConfig;
use crate::queue::{Queue, SqsTransport};
use crate::subscription::Subscription;
use crate::topic::Topic;

const SUBSCRIPTION_PROTOCOL_SQS: &str = "sqs";
const TOPIC_ARN_ATTRIBUTE: &str = "TopicArn";

/// Redrive policy document attached to queues with a dead-letter target.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RedrivePolicy<'a> {
    max_receive_count: u32,
    dead_letter_target_arn: &'a str,
}

/// Client for provisioning and looking up queues, topics and subscriptions.
#[derive(Clone)]
pub struct PubsubClient {
    sqs: SqsClient,
    sns: SnsClient,
    config: ConsumerConfig,
}

impl PubsubClient {
    /// Wraps pre-configured SQS and SNS clients.
    #[must_use]
    pub const fn new(sqs: SqsClient, sns: SnsClient, config: ConsumerConfig) -> Self {
        Self { sqs, sns, config }
    }

    /// Builds a client from the default AWS configuration of the
    /// environment.
    pub async fn from_env(config: ConsumerConfig) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        Self::new(
            SqsClient::new(&aws_config),
            SnsClient::new(&aws_config),
            config,
        )
    }

    fn transport(&self) -> Arc<SqsTransport> {
        Arc::new(SqsTransport::new(self.sqs.clone()))
    }

    /// Looks up an existing queue by ARN.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the ARN is malformed or the queue URL cannot
    /// be resolved.
    pub async fn queue(&self, queue_arn: &str) -> ClientResult<Queue> {
        let arn: Arn = queue_arn.parse()?;

        let result = self
            .sqs
            .get_queue_url()
            .queue_name(arn.resource())
            .queue_owner_aws_account_id(arn.account_id())
            .send()
            .await?;
        let url = result
            .queue_url()
            .ok_or(ClientError::MissingResponseField("QueueUrl"))?;

        Ok(Queue::new(
            self.transport(),
            arn,
            url,
            self.config.clone(),
        ))
    }

    /// Looks up an existing topic by ARN, verifying it exists.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the ARN is malformed or the topic's
    /// attributes cannot be read.
    pub async fn topic(&self, topic_arn: &str) -> ClientResult<Topic> {
        let arn: Arn = topic_arn.parse()?;

        self.sns
            .get_topic_attributes()
            .topic_arn(topic_arn)
            .send()
            .await?;

        Ok(Topic::new(self.sns.clone(), arn))
    }

    /// Looks up an existing SQS subscription by ARN, resolving the topic it
    /// belongs to and the queue it delivers to.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the ARN is malformed, any lookup fails, or
    /// the topic has no SQS subscription with this ARN.
    pub async fn subscription(&self, subscription_arn: &str) -> ClientResult<Subscription> {
        subscription_arn.parse::<Arn>()?;

        let result = self
            .sns
            .get_subscription_attributes()
            .subscription_arn(subscription_arn)
            .send()
            .await?;
        let topic_arn = result
            .attributes()
            .and_then(|attrs| attrs.get(TOPIC_ARN_ATTRIBUTE))
            .ok_or(ClientError::MissingResponseField(TOPIC_ARN_ATTRIBUTE))?
            .clone();

        let topic = self.topic(&topic_arn).await?;

        let subscriptions = self
            .sns
            .list_subscriptions_by_topic()
            .topic_arn(&topic_arn)
            .send()
            .await?;

        for subscription in subscriptions.subscriptions() {
            if subscription.protocol() == Some(SUBSCRIPTION_PROTOCOL_SQS)
                && subscription.subscription_arn() == Some(subscription_arn)
            {
                let endpoint = subscription
                    .endpoint()
                    .ok_or(ClientError::MissingResponseField("Endpoint"))?;
                let queue = self.queue(endpoint).await?;

                return Ok(Subscription::new(
                    subscription_arn.to_string(),
                    topic,
                    queue,
                ));
            }
        }

        Err(ClientError::SubscriptionNotFound(
            subscription_arn.to_string(),
        ))
    }

    /// Creates a queue and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the queue cannot be created or its ARN
    /// cannot be read back.
    pub async fn create_queue(
        &self,
        queue_name: &str,
        attributes: HashMap<String, String>,
    ) -> ClientResult<Queue> {
        let created = self
            .sqs
            .create_queue()
            .queue_name(queue_name)
            .set_attributes(queue_attribute_map(attributes))
            .send()
            .await?;
        let url = created
            .queue_url()
            .ok_or(ClientError::MissingResponseField("QueueUrl"))?;

        let result = self
            .sqs
            .get_queue_attributes()
            .queue_url(url)
            .attribute_names(QueueAttributeName::QueueArn)
            .send()
            .await?;
        let arn: Arn = result
            .attributes()
            .and_then(|attrs| attrs.get(&QueueAttributeName::QueueArn))
            .ok_or(ClientError::MissingResponseField("QueueArn"))?
            .parse()?;

        Ok(Queue::new(
            self.transport(),
            arn,
            url,
            self.config.clone(),
        ))
    }

    /// Creates a queue whose failed messages are routed to `dead_letter`
    /// once a message has been received `max_receive_count` times.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the queue cannot be created or its ARN
    /// cannot be read back.
    pub async fn create_queue_with_dead_letter(
        &self,
        queue_name: &str,
        dead_letter: &Queue,
        max_receive_count: u32,
        mut attributes: HashMap<String, String>,
    ) -> ClientResult<Queue> {
        let target_arn = dead_letter.arn().to_string();
        let policy = serde_json::to_string(&RedrivePolicy {
            max_receive_count,
            dead_letter_target_arn: &target_arn,
        })?;
        attributes.insert(
            QueueAttributeName::RedrivePolicy.as_str().to_string(),
            policy,
        );

        self.create_queue(queue_name, attributes).await
    }

    /// Creates a topic and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the topic cannot be created or the service
    /// returns no topic ARN.
    pub async fn create_topic(
        &self,
        topic_name: &str,
        attributes: HashMap<String, String>,
    ) -> ClientResult<Topic> {
        let result = self
            .sns
            .create_topic()
            .name(topic_name)
            .set_attributes((!attributes.is_empty()).then_some(attributes))
            .send()
            .await?;
        let arn: Arn = result
            .topic_arn()
            .ok_or(ClientError::MissingResponseField(TOPIC_ARN_ATTRIBUTE))?
            .parse()?;

        Ok(Topic::new(self.sns.clone(), arn))
    }

    /// Subscribes a queue to a topic so published messages fan out to it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the subscription cannot be created or the
    /// service returns no subscription ARN.
    pub async fn subscribe(
        &self,
        topic: &Topic,
        queue: &Queue,
        attributes: HashMap<String, String>,
    ) -> ClientResult<Subscription> {
        let result = self
            .sns
            .subscribe()
            .topic_arn(topic.arn().to_string())
            .protocol(SUBSCRIPTION_PROTOCOL_SQS)
            .endpoint(queue.arn().to_string())
            .return_subscription_arn(true)
            .set_attributes((!attributes.is_empty()).then_some(attributes))
            .send()
            .await?;
        let subscription_arn = result
            .subscription_arn()
            .ok_or(ClientError::MissingResponseField("SubscriptionArn"))?;

        Ok(Subscription::new(
            subscription_arn.to_string(),
            topic.clone(),
            queue.clone(),
        ))
    }
}

fn queue_attribute_map(
    attributes: HashMap<String, String>,
) -> Option<HashMap<QueueAttributeName, String>> {
    (!attributes.is_empty()).then(|| {
        attributes
            .into_iter()
            .map(|(name, value)| (QueueAttributeName::from(name.as_str()), value))
            .collect()
    })
}
