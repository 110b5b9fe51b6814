//! Subscription handle tying a topic to the queue it fans out to.

use crate::queue::Queue;
use crate::topic::Topic;

/// Handle to one topic-to-queue subscription.
///
/// The subscription state itself lives in the messaging service; this handle
/// only carries its identity and the endpoints it connects.
#[derive(Clone)]
pub struct Subscription {
    arn: String,
    topic: Topic,
    queue: Queue,
}

impl Subscription {
    pub(crate) const fn new(arn: String, topic: Topic, queue: Queue) -> Self {
        Self { arn, topic, queue }
    }

    /// The subscription ARN.
    #[must_use]
    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// The topic messages fan out from.
    #[must_use]
    pub const fn topic(&self) -> &Topic {
        &self.topic
    }

    /// The queue messages are delivered to.
    #[must_use]
    pub const fn queue(&self) -> &Queue {
        &self.queue
    }
}
