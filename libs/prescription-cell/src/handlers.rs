use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    Json,
};
use tracing::debug;

use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::AppState;

use crate::models::{CreatePrescriptionQuery, DispenseAck, Medication, Prescription};
use crate::services::PrescriptionService;

#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    query: Result<Query<CreatePrescriptionQuery>, QueryRejection>,
    payload: Result<Json<Vec<Medication>>, JsonRejection>,
) -> Result<Json<Prescription>, AppError> {
    let Query(query) = query?;
    let Json(medications) = payload?;
    debug!("User {} prescribing for patient {}", user.id, query.patient_id);

    let prescription = PrescriptionService::new(&state)
        .create_prescription(
            &user,
            &query.patient_id,
            medications,
            query.diagnosis,
            query.instructions,
        )
        .await?;

    Ok(Json(prescription))
}

#[axum::debug_handler]
pub async fn list_prescriptions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Prescription>>, AppError> {
    let prescriptions = PrescriptionService::new(&state).list_prescriptions(&user).await?;

    Ok(Json(prescriptions))
}

#[axum::debug_handler]
pub async fn dispense_prescription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(prescription_id): Path<String>,
) -> Result<Json<DispenseAck>, AppError> {
    let ack = PrescriptionService::new(&state)
        .dispense(&user, &prescription_id)
        .await?;

    Ok(Json(ack))
}
