pub mod address;
pub mod api;
pub mod config;
pub mod error;
pub mod mail;
pub mod models;
pub mod queue;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use address::normalize_email;
pub use config::Config;
pub use error::{AppError, Result};
pub use mail::{EmailService, MailError};
pub use queue::{QueueError, TaskQueueClient};
pub use state::AppState;
