use std::sync::Arc;

use crate::config::Config;
use crate::mail::EmailService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mail: Arc<EmailService>,
}

impl AppState {
    pub fn new(config: Config, mail: EmailService) -> Self {
        Self {
            config: Arc::new(config),
            mail: Arc::new(mail),
        }
    }
}
