use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query, State},
    Json,
};
use tracing::debug;

use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::AppState;

use crate::models::{Chat, CreateChatQuery, Message, SendMessageQuery};
use crate::services::ChatService;

#[axum::debug_handler]
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    query: Result<Query<CreateChatQuery>, QueryRejection>,
) -> Result<Json<Chat>, AppError> {
    let Query(query) = query?;
    debug!("User {} opening chat with doctor {}", user.id, query.doctor_id);

    let chat = ChatService::new(&state).create_chat(&user, &query.doctor_id).await?;

    Ok(Json(chat))
}

#[axum::debug_handler]
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Chat>>, AppError> {
    let chats = ChatService::new(&state).list_chats(&user).await?;

    Ok(Json(chats))
}

#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = ChatService::new(&state).list_messages(&user, &chat_id).await?;

    Ok(Json(messages))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(chat_id): Path<String>,
    query: Result<Query<SendMessageQuery>, QueryRejection>,
) -> Result<Json<Message>, AppError> {
    let Query(query) = query?;

    let message = ChatService::new(&state)
        .send_message(&user, &chat_id, query.content)
        .await?;

    Ok(Json(message))
}
