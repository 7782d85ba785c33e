use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Config as RedisConfig, Pool, Runtime};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use super::QueueError;
use crate::config::QueueConfig;

/// Envelope published on a worker queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMessage {
    pub id: String,
    pub task: String,
    pub kwargs: serde_json::Value,
    pub queue: String,
    /// List the worker pushes its return value onto
    pub reply_to: String,
    pub content_type: String,
    /// Seconds before an unacknowledged message is redelivered
    pub visibility_timeout: u64,
    /// Seconds the worker keeps `reply_to` alive (`EXPIRE`) after pushing a
    /// reply nobody may be waiting for anymore
    pub result_ttl: u64,
    pub worker_pool: String,
    pub sent_at: DateTime<Utc>,
}

/// Transport between the client and the remote workers
#[async_trait]
pub trait TaskBroker: Send + Sync + 'static {
    /// Push a message onto its queue without waiting for the worker.
    async fn publish(&self, message: &TaskMessage) -> Result<(), QueueError>;

    /// Wait up to `timeout` for a reply on `reply_to`. `Ok(None)` means the
    /// wait timed out.
    async fn wait_result(
        &self,
        reply_to: &str,
        timeout: Duration,
    ) -> Result<Option<serde_json::Value>, QueueError>;

    async fn ping(&self) -> Result<(), QueueError>;
}

/// Create a Redis connection pool
pub fn create_pool(url: &str) -> Result<Pool, QueueError> {
    let redis_config = RedisConfig::from_url(url);
    let pool = redis_config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| QueueError::Broker(format!("Failed to create Redis pool: {}", e)))?;

    Ok(pool)
}

/// Redis lists as broker, a second Redis database as result backend
#[derive(Clone)]
pub struct RedisBroker {
    broker: Pool,
    backend: Pool,
}

impl RedisBroker {
    pub fn new(broker: Pool, backend: Pool) -> Self {
        Self { broker, backend }
    }

    /// Build both pools without touching the network. Connections are opened
    /// on first use.
    pub fn open(config: &QueueConfig) -> Result<Self, QueueError> {
        Ok(Self::new(
            create_pool(&config.broker_url)?,
            create_pool(&config.backend_url)?,
        ))
    }

    /// Build both pools and make sure both endpoints answer within
    /// `health_timeout`.
    pub async fn connect(config: &QueueConfig) -> Result<Self, QueueError> {
        let broker = Self::open(config)?;

        tokio::time::timeout(config.health_timeout, broker.ping())
            .await
            .map_err(|_| {
                QueueError::Broker(format!(
                    "PING timed out after {}s",
                    config.health_timeout.as_secs()
                ))
            })??;

        tracing::info!(
            email_queue = %config.email_queue,
            worker_pool = %config.worker_pool,
            "Task broker connected"
        );
        Ok(broker)
    }

    async fn ping_pool(pool: &Pool) -> Result<(), QueueError> {
        let mut conn = pool.get().await?;

        let pong: String = redis::cmd("PING").query_async(&mut *conn).await?;
        if pong != "PONG" {
            return Err(QueueError::Broker(format!("Unexpected PING reply: {}", pong)));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskBroker for RedisBroker {
    async fn publish(&self, message: &TaskMessage) -> Result<(), QueueError> {
        let mut conn = self.broker.get().await?;
        let json = serde_json::to_string(message)?;

        conn.lpush::<_, _, ()>(&message.queue, &json).await?;

        tracing::debug!(task_id = %message.id, queue = %message.queue, "Task published");
        Ok(())
    }

    async fn wait_result(
        &self,
        reply_to: &str,
        timeout: Duration,
    ) -> Result<Option<serde_json::Value>, QueueError> {
        let mut conn = self.backend.get().await?;

        // BLPOP treats 0 as "block forever"
        let seconds = timeout.as_secs().max(1);
        let popped: Option<(String, String)> = redis::cmd("BLPOP")
            .arg(reply_to)
            .arg(seconds)
            .query_async(&mut *conn)
            .await?;

        match popped {
            Some((_, data)) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), QueueError> {
        Self::ping_pool(&self.broker).await?;
        Self::ping_pool(&self.backend).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_utc_timestamp() {
        let message = TaskMessage {
            id: "job-1".to_string(),
            task: "email_tasks.health_check".to_string(),
            kwargs: json!({}),
            queue: "email_tasks_queue".to_string(),
            reply_to: "task-result:job-1".to_string(),
            content_type: "application/json".to_string(),
            visibility_timeout: 3600,
            result_ttl: 86400,
            worker_pool: "solo".to_string(),
            sent_at: "2026-01-02T03:04:05Z".parse().unwrap(),
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["sent_at"], json!("2026-01-02T03:04:05Z"));
        assert_eq!(value["reply_to"], json!("task-result:job-1"));
        assert_eq!(value["result_ttl"], json!(86400));
    }

    #[tokio::test]
    async fn test_open_does_not_connect() {
        let mut config = crate::testing::queue_config(false);
        config.broker_url = "redis://127.0.0.1:1/0".to_string();
        config.backend_url = "redis://127.0.0.1:1/1".to_string();

        assert!(RedisBroker::open(&config).is_ok());
        assert!(RedisBroker::connect(&config).await.is_err());
    }
}
