//! Background task queue client.
//!
//! Work is published as JSON [`TaskMessage`] envelopes on Redis lists, one
//! list per remote worker. Workers reply by pushing the task's return value on
//! the envelope's `reply_to` list, which is how health probes get an answer.

pub mod broker;
pub mod client;
pub mod tasks;

pub use broker::{create_pool, RedisBroker, TaskBroker, TaskMessage};
pub use client::TaskQueueClient;
pub use tasks::{
    BeautifyPiano, EmailHealthCheck, PianoHealthCheck, RemoteTask, SendMail, TaskName, Worker,
};

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Task queue initialization failed: {0}")]
    Initialization(String),

    #[error("Task {0} is not registered on this client")]
    NotRegistered(TaskName),

    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Task payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for QueueError {
    fn from(err: redis::RedisError) -> Self {
        QueueError::Broker(err.to_string())
    }
}

impl From<deadpool_redis::PoolError> for QueueError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        QueueError::Broker(err.to_string())
    }
}
