/// Receive-side tuning for queue consumption.
///
/// Passed to [`crate::PubsubClient`] at construction and shared by every
/// queue handle it creates; there is no process-wide configuration state.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Maximum number of messages pulled by one receive call.
    pub max_messages: i32,
    /// Long-poll wait, in seconds, for one receive call.
    pub wait_time_seconds: i32,
    /// Visibility timeout, in seconds, applied when a message is requeued
    /// for retry. Kept shorter than the queue's own visibility timeout so a
    /// failed message comes back sooner.
    pub requeue_visibility_timeout: i32,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            max_messages: 10,
            wait_time_seconds: 20,
            requeue_visibility_timeout: 10,
        }
    }
}
