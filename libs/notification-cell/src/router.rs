use std::sync::Arc;

use axum::{routing::get, Router};

use shared_utils::AppState;

use crate::handlers;

/// Unauthenticated: the path segment alone names the user.
pub fn notification_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws/{user_id}", get(handlers::connect))
        .with_state(state)
}
