use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    response::Response,
};
use futures::StreamExt;
use tracing::debug;

use shared_utils::AppState;

use crate::session::serve_connection;

pub async fn connect(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Response {
    debug!("WebSocket upgrade requested for user {}", user_id);
    let registry = state.registry.clone();

    ws.on_upgrade(move |socket| async move {
        let (sink, stream) = socket.split();
        serve_connection(sink, stream, registry, user_id).await;
    })
}
