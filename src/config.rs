use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub smtp: SmtpConfig,
    pub queue: QueueConfig,
}

/// SMTP settings for the direct delivery path
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub default_from_address: String,
    pub timeout_secs: u64,
}

/// Broker settings for the background delivery path
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub broker_url: String,
    pub backend_url: String,
    pub worker_pool: String,
    pub visibility_timeout: Duration,
    pub email_queue: String,
    pub piano_queue: String,
    pub result_prefix: String,
    /// How long workers keep a reply that nobody collected
    pub result_ttl: Duration,
    pub health_timeout: Duration,
    /// Probe the email worker while constructing the client
    pub eager_health_check: bool,
    /// Also register the piano worker's tasks
    pub enable_piano_tasks: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort("SERVER_PORT"))?,
            smtp: SmtpConfig::from_env()?,
            queue: QueueConfig::from_env(),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl SmtpConfig {
    /// Missing variables are left empty here and rejected by [`SmtpConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("SMTP_SERVER_PORT") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort("SMTP_SERVER_PORT"))?,
            _ => 0,
        };

        Ok(SmtpConfig {
            host: env::var("SMTP_SERVER").unwrap_or_default(),
            port,
            username: env::var("SMTP_USER").unwrap_or_default(),
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            default_from_address: env::var("FROM_EMAIL").unwrap_or_default(),
            timeout_secs: env::var("SMTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }

    /// Names of the required settings that are empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("SMTP_SERVER");
        }
        if self.port == 0 {
            missing.push("SMTP_SERVER_PORT");
        }
        if self.username.trim().is_empty() {
            missing.push("SMTP_USER");
        }
        if self.password.is_empty() {
            missing.push("SMTP_PASSWORD");
        }
        if self.default_from_address.trim().is_empty() {
            missing.push("FROM_EMAIL");
        }
        missing
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::IncompleteSmtp(missing.join(", ")))
        }
    }
}

impl QueueConfig {
    pub fn from_env() -> Self {
        QueueConfig {
            broker_url: env::var("BROKER_URL")
                .unwrap_or_else(|_| "redis://localhost:6379/0".to_string()),
            backend_url: env::var("RESULT_BACKEND_URL")
                .unwrap_or_else(|_| "redis://localhost:6379/1".to_string()),
            worker_pool: env::var("WORKER_POOL").unwrap_or_else(|_| "solo".to_string()),
            visibility_timeout: Duration::from_secs(
                env::var("VISIBILITY_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .unwrap_or(3600),
            ),
            email_queue: env::var("EMAIL_TASK_QUEUE")
                .unwrap_or_else(|_| "email_tasks_queue".to_string()),
            piano_queue: env::var("PIANO_TASK_QUEUE")
                .unwrap_or_else(|_| "piano_tasks_queue".to_string()),
            result_prefix: env::var("RESULT_KEY_PREFIX")
                .unwrap_or_else(|_| "task-result:".to_string()),
            result_ttl: Duration::from_secs(
                env::var("RESULT_TTL_SECONDS")
                    .unwrap_or_else(|_| "86400".to_string())
                    .parse()
                    .unwrap_or(86400),
            ),
            health_timeout: Duration::from_secs(
                env::var("HEALTH_CHECK_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            ),
            eager_health_check: env_flag("EAGER_HEALTH_CHECK", true),
            enable_piano_tasks: env_flag("ENABLE_PIANO_TASKS", false),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port in {0}")]
    InvalidPort(&'static str),
    #[error("Incomplete SMTP configuration, missing: {0}")]
    IncompleteSmtp(String),
}
