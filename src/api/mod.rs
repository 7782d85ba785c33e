pub mod emails;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Versioned email API plus the unversioned health probes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/emails", emails::email_routes())
        .merge(health::health_routes())
        .with_state(state)
}
