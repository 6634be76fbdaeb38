use std::sync::Arc;

use axum::{routing::get, Router};

use auth_cell::{auth_routes, user_routes};
use chat_cell::chat_routes;
use doctor_cell::router::doctor_routes;
use notification_cell::notification_routes;
use prescription_cell::prescription_routes;
use shared_utils::AppState;

pub const BANNER: &str = "Telemedicine API is running!";

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest(
            "/users",
            user_routes(state.clone()).merge(doctor_routes(state.clone())),
        )
        .nest("/chats", chat_routes(state.clone()))
        .nest("/prescriptions", prescription_routes(state.clone()));

    Router::new()
        .route("/", get(|| async { BANNER }))
        .nest("/api", api)
        .merge(notification_routes(state))
}
