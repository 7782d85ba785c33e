use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use super::broker::{RedisBroker, TaskBroker, TaskMessage};
use super::tasks::{EmailHealthCheck, PianoHealthCheck, RemoteTask, TaskName, Worker};
use super::QueueError;
use crate::config::QueueConfig;
use crate::models::{HealthStatus, TaskHandle};

/// Extra time granted to the broker round-trip on top of the reply wait
const WAIT_GRACE: Duration = Duration::from_secs(1);

/// Client for the remote task workers.
///
/// Only tasks registered at construction can be enqueued. The email worker's
/// tasks are always registered; the piano worker's only when
/// `enable_piano_tasks` is set.
#[derive(Clone)]
pub struct TaskQueueClient {
    broker: Arc<dyn TaskBroker>,
    config: Arc<QueueConfig>,
    registered: Vec<TaskName>,
}

impl TaskQueueClient {
    /// Connect to Redis and, when `eager_health_check` is set, probe the
    /// email worker. Any failure leaves no client behind.
    ///
    /// The lazy variant only builds the pools, so an unreachable Redis is
    /// reported by the first `delay` or `health_check` instead.
    pub async fn connect(config: QueueConfig) -> Result<Self, QueueError> {
        let broker = if config.eager_health_check {
            RedisBroker::connect(&config).await
        } else {
            RedisBroker::open(&config)
        }
        .map_err(|e| QueueError::Initialization(e.to_string()))?;

        Self::with_broker(config, Arc::new(broker)).await
    }

    pub async fn with_broker(
        config: QueueConfig,
        broker: Arc<dyn TaskBroker>,
    ) -> Result<Self, QueueError> {
        let mut registered = TaskName::EMAIL_TASKS.to_vec();
        if config.enable_piano_tasks {
            registered.extend(TaskName::PIANO_TASKS);
        }

        let client = Self {
            broker,
            config: Arc::new(config),
            registered,
        };

        if !client.config.eager_health_check {
            tracing::info!("Eager health check disabled, worker will be probed on demand");
            return Ok(client);
        }

        let status = client.health_check().await;
        if !status.is_ok() {
            let err = QueueError::Initialization(format!(
                "Initialization failed: {}",
                status.message.as_deref().unwrap_or("worker reported ERROR")
            ));
            tracing::error!(error = %err, "Error during task queue initialization");
            return Err(err);
        }

        tracing::info!(tasks = ?client.registered, "Task queue client ready");
        Ok(client)
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn registered_tasks(&self) -> &[TaskName] {
        &self.registered
    }

    pub fn is_registered(&self, name: TaskName) -> bool {
        self.registered.contains(&name)
    }

    /// Enqueue a task and return without waiting for the worker.
    pub async fn delay<T: RemoteTask>(&self, task: &T) -> Result<TaskHandle, QueueError> {
        let message = self.message_for(task)?;
        self.broker.publish(&message).await?;

        Ok(TaskHandle {
            id: message.id,
            task: T::NAME,
            queue: message.queue,
        })
    }

    /// Ping the email worker. Failures come back as an `ERROR` status.
    pub async fn health_check(&self) -> HealthStatus {
        self.probe(&EmailHealthCheck {}, "Health check").await
    }

    /// Ping the piano worker. Failures come back as an `ERROR` status.
    pub async fn check_piano_health(&self) -> HealthStatus {
        self.probe(&PianoHealthCheck {}, "Piano health").await
    }

    async fn probe<T: RemoteTask>(&self, task: &T, label: &str) -> HealthStatus {
        let message = match self.message_for(task) {
            Ok(message) => message,
            Err(e) => return HealthStatus::error(format!("{} failed: {}", label, e)),
        };

        let timeout = self.config.health_timeout;
        let round_trip = async {
            self.broker.publish(&message).await?;
            tracing::info!(task_id = %message.id, task = T::NAME.as_str(), "Health check task submitted");
            self.broker.wait_result(&message.reply_to, timeout).await
        };

        let status = match tokio::time::timeout(timeout + WAIT_GRACE, round_trip).await {
            Ok(Ok(Some(value))) => serde_json::from_value::<HealthStatus>(value).unwrap_or_else(
                |e| HealthStatus::error(format!("{} task failed: malformed reply: {}", label, e)),
            ),
            Ok(Ok(None)) | Err(_) => HealthStatus::error(format!(
                "{} task failed: timed out after {}s waiting for worker reply",
                label,
                timeout.as_secs()
            )),
            Ok(Err(e)) => HealthStatus::error(format!("{} task failed: {}", label, e)),
        };

        if status.is_ok() {
            tracing::info!(task_id = %message.id, "Health check result: OK");
        } else {
            tracing::error!(
                task_id = %message.id,
                message = status.message.as_deref().unwrap_or_default(),
                "Health check result: ERROR"
            );
        }
        status
    }

    fn message_for<T: RemoteTask>(&self, task: &T) -> Result<TaskMessage, QueueError> {
        if !self.is_registered(T::NAME) {
            return Err(QueueError::NotRegistered(T::NAME));
        }

        let id = Uuid::new_v4().to_string();
        let queue = match T::NAME.worker() {
            Worker::Email => self.config.email_queue.clone(),
            Worker::Piano => self.config.piano_queue.clone(),
        };

        Ok(TaskMessage {
            reply_to: format!("{}{}", self.config.result_prefix, id),
            id,
            task: T::NAME.as_str().to_string(),
            kwargs: serde_json::to_value(task)?,
            queue,
            content_type: "application/json".to_string(),
            visibility_timeout: self.config.visibility_timeout.as_secs(),
            result_ttl: self.config.result_ttl.as_secs(),
            worker_pool: self.config.worker_pool.clone(),
            sent_at: Utc::now(),
        })
    }
}
