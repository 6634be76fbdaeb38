use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use tracing::debug;

use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_models::user::{User, UserSummary};
use shared_utils::AppState;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AuthService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(request) = payload?;

    let response = AuthService::new(&state).register(request).await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(request) = payload?;

    let response = AuthService::new(&state).login(request).await?;

    Ok(Json(response))
}

pub async fn get_current_user(Extension(user): Extension<User>) -> Json<UserSummary> {
    debug!("Getting profile for user: {}", user.id);
    Json(user.summary())
}
