//! Test doubles shared by the unit tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lettre::Message;

use crate::config::{Config, QueueConfig, SmtpConfig};
use crate::mail::{BoxError, MailTransport};
use crate::queue::{QueueError, TaskBroker, TaskMessage};

pub(crate) fn app_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        smtp: smtp_config(),
        queue: queue_config(false),
    }
}

pub(crate) fn smtp_config() -> SmtpConfig {
    SmtpConfig {
        host: "smtp.example.com".to_string(),
        port: 587,
        username: "mailer".to_string(),
        password: "secret".to_string(),
        default_from_address: "noreply@pytune.com".to_string(),
        timeout_secs: 30,
    }
}

pub(crate) fn queue_config(eager_health_check: bool) -> QueueConfig {
    QueueConfig {
        broker_url: "redis://localhost:6379/0".to_string(),
        backend_url: "redis://localhost:6379/1".to_string(),
        worker_pool: "solo".to_string(),
        visibility_timeout: Duration::from_secs(3600),
        email_queue: "email_tasks_queue".to_string(),
        piano_queue: "piano_tasks_queue".to_string(),
        result_prefix: "task-result:".to_string(),
        result_ttl: Duration::from_secs(86400),
        health_timeout: Duration::from_secs(10),
        eager_health_check,
        enable_piano_tasks: false,
    }
}

/// How [`MockBroker`] answers
#[derive(Clone)]
pub(crate) enum BrokerReply {
    Value(serde_json::Value),
    Timeout,
    Unreachable,
    /// Every call hangs, like a blackholed host
    Stall,
}

/// Broker that records published messages and answers every wait the same way
pub(crate) struct MockBroker {
    reply: BrokerReply,
    published: Mutex<Vec<TaskMessage>>,
}

impl MockBroker {
    pub(crate) fn replying(reply: BrokerReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            published: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn published(&self) -> Vec<TaskMessage> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskBroker for MockBroker {
    async fn publish(&self, message: &TaskMessage) -> Result<(), QueueError> {
        match self.reply {
            BrokerReply::Unreachable => {
                return Err(QueueError::Broker("connection refused".to_string()))
            }
            BrokerReply::Stall => std::future::pending::<()>().await,
            _ => {}
        }
        self.published.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn wait_result(
        &self,
        _reply_to: &str,
        _timeout: Duration,
    ) -> Result<Option<serde_json::Value>, QueueError> {
        match &self.reply {
            BrokerReply::Value(value) => Ok(Some(value.clone())),
            BrokerReply::Timeout => Ok(None),
            BrokerReply::Unreachable => Err(QueueError::Broker("connection refused".to_string())),
            BrokerReply::Stall => std::future::pending().await,
        }
    }

    async fn ping(&self) -> Result<(), QueueError> {
        match self.reply {
            BrokerReply::Unreachable => Err(QueueError::Broker("connection refused".to_string())),
            BrokerReply::Stall => std::future::pending().await,
            _ => Ok(()),
        }
    }
}

/// Transport that keeps every message it is asked to send
#[derive(Default)]
pub(crate) struct RecordingTransport {
    fail: bool,
    sent: Mutex<Vec<Message>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: Message) -> Result<(), BoxError> {
        self.sent.lock().unwrap().push(message);
        if self.fail {
            return Err("535 authentication failed".into());
        }
        Ok(())
    }
}
