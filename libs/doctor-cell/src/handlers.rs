use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use tracing::debug;

use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::AppState;

use crate::models::DoctorSummary;
use crate::services::DoctorService;

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<DoctorSummary>>, AppError> {
    debug!("Doctor directory requested by {}", user.id);

    let doctors = DoctorService::new(&state).list_doctors().await?;

    Ok(Json(doctors))
}
