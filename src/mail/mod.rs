//! Email dispatch: direct SMTP delivery or background delivery through the
//! task queue.

pub mod message;
pub mod service;
pub mod transport;

pub use message::{build_message, SENDER_NAME};
pub use service::EmailService;
pub use transport::{MailTransport, SmtpTransport};

use crate::config::ConfigError;
use crate::queue::QueueError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Background delivery requested but the task queue is unavailable")]
    QueueUnavailable,

    #[error("SMTP delivery to {to} failed: {source}")]
    Transport {
        to: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl From<ConfigError> for MailError {
    fn from(err: ConfigError) -> Self {
        MailError::Configuration(err.to_string())
    }
}
