use serde::{Deserialize, Serialize};

/// Request to dispatch one email
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailRequest {
    pub to_address: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub is_html: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub deliver_in_background: bool,
}

impl EmailRequest {
    pub fn new(
        to_address: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to_address: to_address.into(),
            subject: subject.into(),
            body: body.into(),
            is_html: false,
            from_address: None,
            reply_to: None,
            deliver_in_background: false,
        }
    }

    pub fn html(mut self) -> Self {
        self.is_html = true;
        self
    }

    pub fn from_address(mut self, from: impl Into<String>) -> Self {
        self.from_address = Some(from.into());
        self
    }

    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn in_background(mut self) -> Self {
        self.deliver_in_background = true;
        self
    }
}

/// State reported for a freshly queued job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    Pending,
}

/// Outcome of a dispatch call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DispatchResult {
    Queued {
        job_id: String,
        queue: String,
        task: String,
        state: JobState,
    },
    Sent {
        message: String,
    },
}

impl DispatchResult {
    pub const SENT_MESSAGE: &'static str = "Email sent successfully";

    pub fn sent() -> Self {
        DispatchResult::Sent {
            message: Self::SENT_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_defaults_when_deserializing() {
        let request: EmailRequest = serde_json::from_value(json!({
            "to_address": "user@example.com",
            "subject": "Hi",
            "body": "Hello"
        }))
        .unwrap();

        assert_eq!(request, EmailRequest::new("user@example.com", "Hi", "Hello"));
    }

    #[test]
    fn test_dispatch_result_wire_shape() {
        let queued = DispatchResult::Queued {
            job_id: "abc".to_string(),
            queue: "email_tasks_queue".to_string(),
            task: "email_tasks.send_mail".to_string(),
            state: JobState::Pending,
        };

        assert_eq!(
            serde_json::to_value(&queued).unwrap(),
            json!({
                "job_id": "abc",
                "queue": "email_tasks_queue",
                "task": "email_tasks.send_mail",
                "state": "PENDING"
            })
        );
        assert_eq!(
            serde_json::to_value(DispatchResult::sent()).unwrap(),
            json!({ "message": "Email sent successfully" })
        );
    }
}
