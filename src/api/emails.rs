use axum::{extract::State, routing::post, Json, Router};

use crate::error::Result;
use crate::models::{DispatchResult, EmailRequest};
use crate::state::AppState;

/// Email routes
pub fn email_routes() -> Router<AppState> {
    Router::new().route("/", post(send_email))
}

/// POST /api/v1/emails - Send now or queue for background delivery
async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<DispatchResult>> {
    let result = state.mail.send(&request).await?;
    Ok(Json(result))
}
