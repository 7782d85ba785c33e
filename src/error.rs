use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::mail::MailError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Upstream error: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        let message = err.to_string();
        match err {
            MailError::InvalidAddress(_) | MailError::Build(_) => AppError::BadRequest(message),
            MailError::Configuration(_) => AppError::InternalError(message),
            MailError::Transport { .. } | MailError::Queue(_) => AppError::BadGateway(message),
            MailError::QueueUnavailable => AppError::ServiceUnavailable(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
