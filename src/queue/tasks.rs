use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote worker owning a group of tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Worker {
    Email,
    Piano,
}

/// Every remote task this client knows how to invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskName {
    #[serde(rename = "email_tasks.health_check")]
    EmailHealthCheck,
    #[serde(rename = "email_tasks.send_mail")]
    SendMail,
    #[serde(rename = "piano_tasks.health_check")]
    PianoHealthCheck,
    #[serde(rename = "piano_tasks.beautify_piano")]
    BeautifyPiano,
}

impl TaskName {
    pub const EMAIL_TASKS: [TaskName; 2] = [TaskName::EmailHealthCheck, TaskName::SendMail];
    pub const PIANO_TASKS: [TaskName; 2] = [TaskName::PianoHealthCheck, TaskName::BeautifyPiano];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::EmailHealthCheck => "email_tasks.health_check",
            TaskName::SendMail => "email_tasks.send_mail",
            TaskName::PianoHealthCheck => "piano_tasks.health_check",
            TaskName::BeautifyPiano => "piano_tasks.beautify_piano",
        }
    }

    pub fn worker(&self) -> Worker {
        match self {
            TaskName::EmailHealthCheck | TaskName::SendMail => Worker::Email,
            TaskName::PianoHealthCheck | TaskName::BeautifyPiano => Worker::Piano,
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed payload bound to one remote task.
///
/// The struct's fields are the task's keyword arguments, so a payload can
/// only be enqueued under the name it was declared for.
pub trait RemoteTask: Serialize + Send + Sync {
    const NAME: TaskName;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailHealthCheck {}

impl RemoteTask for EmailHealthCheck {
    const NAME: TaskName = TaskName::EmailHealthCheck;
}

/// Keyword arguments of `email_tasks.send_mail`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMail {
    pub to_email: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
    pub from_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl RemoteTask for SendMail {
    const NAME: TaskName = TaskName::SendMail;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PianoHealthCheck {}

impl RemoteTask for PianoHealthCheck {
    const NAME: TaskName = TaskName::PianoHealthCheck;
}

/// Keyword arguments of `piano_tasks.beautify_piano`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeautifyPiano {
    pub piano_id: String,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl RemoteTask for BeautifyPiano {
    const NAME: TaskName = TaskName::BeautifyPiano;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_wire_names_match_serde() {
        for name in TaskName::EMAIL_TASKS.iter().chain(TaskName::PIANO_TASKS.iter()) {
            assert_eq!(serde_json::to_value(name).unwrap(), json!(name.as_str()));
        }
    }

    #[test]
    fn test_send_mail_kwargs() {
        let kwargs = serde_json::to_value(SendMail {
            to_email: "user@example.com".to_string(),
            subject: "Hi".to_string(),
            body: "<p>Hello</p>".to_string(),
            is_html: true,
            from_email: "noreply@pytune.com".to_string(),
            reply_to: None,
        })
        .unwrap();

        assert_eq!(
            kwargs,
            json!({
                "to_email": "user@example.com",
                "subject": "Hi",
                "body": "<p>Hello</p>",
                "is_html": true,
                "from_email": "noreply@pytune.com"
            })
        );
    }

    #[test]
    fn test_health_checks_carry_empty_kwargs() {
        assert_eq!(serde_json::to_value(EmailHealthCheck {}).unwrap(), json!({}));
        assert_eq!(PianoHealthCheck::NAME.worker(), Worker::Piano);
    }
}
