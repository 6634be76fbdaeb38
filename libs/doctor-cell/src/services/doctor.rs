use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use shared_database::{Collection, DocumentStore, Filter, FindOptions};
use shared_models::user::{User, UserRole};
use shared_utils::users::find_user_with_role;
use shared_utils::AppState;

use crate::models::{DoctorError, DoctorSummary, DOCTOR_LIST_LIMIT};

pub struct DoctorService {
    store: Arc<dyn DocumentStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Active doctors, at most [`DOCTOR_LIST_LIMIT`] of them.
    pub async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, DoctorError> {
        debug!("Listing active doctors");

        let filter = Filter::new()
            .eq("role", UserRole::Doctor.as_str())
            .eq("is_active", true);

        let documents = self
            .store
            .find(Collection::Users, &filter, FindOptions::limit(DOCTOR_LIST_LIMIT))
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        documents.into_iter().map(parse_doctor).collect()
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<User, DoctorError> {
        find_user_with_role(self.store.as_ref(), doctor_id, UserRole::Doctor)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .ok_or(DoctorError::NotFound)
    }
}

fn parse_doctor(document: Value) -> Result<DoctorSummary, DoctorError> {
    serde_json::from_value::<User>(document)
        .map(DoctorSummary::from)
        .map_err(|e| {
            warn!("Malformed doctor record: {}", e);
            DoctorError::DatabaseError(e.to_string())
        })
}
