use serde::{Deserialize, Serialize};

use crate::queue::TaskName;

/// Health verdict reported by a worker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthState {
    Ok,
    Error,
}

/// Result contract of a `health_check` task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: HealthState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: HealthState::Ok,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HealthState::Ok
    }
}

/// Correlation handle for an enqueued task
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskHandle {
    pub id: String,
    pub task: TaskName,
    pub queue: String,
}
