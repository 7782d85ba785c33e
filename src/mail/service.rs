use std::sync::Arc;

use super::{build_message, MailError, MailTransport, SmtpTransport};
use crate::config::{QueueConfig, SmtpConfig};
use crate::models::{DispatchResult, EmailRequest, JobState};
use crate::queue::{SendMail, TaskQueueClient};

/// Decides between direct SMTP delivery and background delivery.
///
/// Built once at startup and shared. When the task queue could not be set up
/// the service runs in degraded mode: direct sends work, background sends
/// fail with [`MailError::QueueUnavailable`].
pub struct EmailService {
    smtp: SmtpConfig,
    transport: Arc<dyn MailTransport>,
    queue: Option<TaskQueueClient>,
}

impl EmailService {
    /// Validate SMTP settings, build the SMTP transport and try to bring up
    /// the task queue client. A queue failure only disables background
    /// delivery.
    pub async fn connect(smtp: SmtpConfig, queue: QueueConfig) -> Result<Self, MailError> {
        smtp.validate()?;
        let transport = SmtpTransport::from_config(&smtp)?;

        let queue = match TaskQueueClient::connect(queue).await {
            Ok(client) => {
                tracing::info!("Background email delivery enabled");
                Some(client)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Task queue unavailable, background delivery disabled");
                None
            }
        };

        Self::new(smtp, Arc::new(transport), queue)
    }

    pub fn new(
        smtp: SmtpConfig,
        transport: Arc<dyn MailTransport>,
        queue: Option<TaskQueueClient>,
    ) -> Result<Self, MailError> {
        smtp.validate()?;

        Ok(Self {
            smtp,
            transport,
            queue,
        })
    }

    pub fn background_enabled(&self) -> bool {
        self.queue.is_some()
    }

    pub fn queue(&self) -> Option<&TaskQueueClient> {
        self.queue.as_ref()
    }

    /// Dispatch one email according to `request.deliver_in_background`.
    pub async fn send(&self, request: &EmailRequest) -> Result<DispatchResult, MailError> {
        let from = request
            .from_address
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(&self.smtp.default_from_address);
        if from.trim().is_empty() {
            return Err(MailError::Configuration(
                "SMTP from address not configured".to_string(),
            ));
        }

        if request.deliver_in_background {
            self.enqueue(request, from).await
        } else {
            self.send_direct(request, from).await
        }
    }

    async fn enqueue(&self, request: &EmailRequest, from: &str) -> Result<DispatchResult, MailError> {
        let queue = self.queue.as_ref().ok_or_else(|| {
            tracing::error!(to = %request.to_address, "Background delivery requested without a task queue");
            MailError::QueueUnavailable
        })?;

        let payload = SendMail {
            to_email: request.to_address.clone(),
            subject: request.subject.clone(),
            body: request.body.clone(),
            is_html: request.is_html,
            from_email: from.to_string(),
            reply_to: request.reply_to.clone(),
        };

        let handle = queue.delay(&payload).await.map_err(|e| {
            tracing::error!(to = %request.to_address, error = %e, "Failed to queue email");
            MailError::from(e)
        })?;

        tracing::info!(job_id = %handle.id, to = %request.to_address, "Queued email");

        Ok(DispatchResult::Queued {
            job_id: handle.id,
            queue: handle.queue,
            task: handle.task.as_str().to_string(),
            state: JobState::Pending,
        })
    }

    async fn send_direct(
        &self,
        request: &EmailRequest,
        from: &str,
    ) -> Result<DispatchResult, MailError> {
        let message = build_message(request, from)?;

        match self.transport.send(message).await {
            Ok(()) => {
                tracing::info!(to = %request.to_address, "Email sent");
                Ok(DispatchResult::sent())
            }
            Err(source) => {
                tracing::error!(to = %request.to_address, error = %source, "Email delivery failed");
                Err(MailError::Transport {
                    to: request.to_address.clone(),
                    source,
                })
            }
        }
    }
}
