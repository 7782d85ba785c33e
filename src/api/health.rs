use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::models::HealthStatus;
use crate::state::AppState;

/// Health response structure
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub background_delivery: String,
    pub email_queue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_worker: Option<HealthStatus>,
    pub timestamp: String,
}

/// Health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/piano", get(piano_health_check))
}

/// GET /health - Service health, including a live probe of the email worker
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let email_worker = match state.mail.queue() {
        Some(queue) => Some(queue.health_check().await),
        None => None,
    };

    let overall_status = match &email_worker {
        Some(worker) if worker.is_ok() => "healthy",
        _ => "degraded",
    };

    let background_delivery = if state.mail.background_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        background_delivery: background_delivery.to_string(),
        email_queue: state.config.queue.email_queue.clone(),
        email_worker,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// GET /health/piano - Probe of the piano worker
async fn piano_health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let status = match state.mail.queue() {
        Some(queue) => queue.check_piano_health().await,
        None => HealthStatus::error("Task queue unavailable"),
    };

    Json(status)
}
