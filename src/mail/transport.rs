use std::time::Duration;

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{BoxError, MailError};
use crate::config::SmtpConfig;

/// Sends a fully built message. Errors keep the underlying cause.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, message: Message) -> Result<(), BoxError>;
}

/// lettre-backed transport used for direct delivery
#[derive(Clone)]
pub struct SmtpTransport<T = AsyncSmtpTransport<Tokio1Executor>> {
    inner: T,
}

impl SmtpTransport {
    /// STARTTLS relay with username/password authentication.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Configuration(format!("Invalid SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self { inner: transport })
    }
}

impl<T> SmtpTransport<T> {
    pub fn with_transport(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T> MailTransport for SmtpTransport<T>
where
    T: AsyncTransport + Send + Sync + 'static,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    async fn send(&self, message: Message) -> Result<(), BoxError> {
        self.inner
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| Box::new(e) as BoxError)
    }
}
