use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn chat_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_chat).get(handlers::list_chats))
        .route(
            "/{chat_id}/messages",
            get(handlers::list_messages).post(handlers::send_message),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
