use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::debug;

use shared_models::error::AppError;
use shared_models::user::User;

use crate::jwt::validate_token;
use crate::state::AppState;
use crate::users::find_user_by_id;

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    if !headers.contains_key(AUTHORIZATION) {
        return Err(AppError::Auth("Missing authorization header".to_string()));
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

/// Turns a bearer token into the stored account it names.
pub async fn resolve_user(state: &AppState, token: &str) -> Result<User, AppError> {
    let claims = validate_token(token, &state.config.jwt_secret).map_err(|e| {
        debug!("Rejecting bearer token: {}", e);
        AppError::Auth("Invalid authentication credentials".to_string())
    })?;

    find_user_by_id(state.store(), &claims.sub)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))
}

// Resolves the caller before any handler runs and stores the account in request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let user = resolve_user(&state, &token).await?;

    debug!("Authenticated {} as {}", user.id, user.role);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
