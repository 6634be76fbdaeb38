use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use shared_database::{Collection, DocumentStore, Filter, FindOptions};
use shared_models::user::{User, UserRole};
use shared_utils::users::find_user_with_role;
use shared_utils::AppState;

use crate::models::{
    DispenseAck, Medication, Prescription, PrescriptionError, PrescriptionStatus,
    PRESCRIPTION_LIST_LIMIT,
};

pub struct PrescriptionService {
    store: Arc<dyn DocumentStore>,
}

impl PrescriptionService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create_prescription(
        &self,
        caller: &User,
        patient_id: &str,
        medications: Vec<Medication>,
        diagnosis: String,
        instructions: String,
    ) -> Result<Prescription, PrescriptionError> {
        if !caller.has_role(UserRole::Doctor) {
            return Err(PrescriptionError::OnlyDoctors);
        }

        let patient = find_user_with_role(self.store.as_ref(), patient_id, UserRole::Patient)
            .await
            .map_err(|e| PrescriptionError::DatabaseError(e.to_string()))?
            .ok_or(PrescriptionError::PatientNotFound)?;

        let prescription = Prescription::new(caller, &patient, medications, diagnosis, instructions);
        let document = serde_json::to_value(&prescription)
            .map_err(|e| PrescriptionError::DatabaseError(e.to_string()))?;

        self.store
            .insert(Collection::Prescriptions, document)
            .await
            .map_err(|e| PrescriptionError::DatabaseError(e.to_string()))?;

        info!(
            "Doctor {} prescribed {} medication(s) to patient {}",
            caller.id,
            prescription.medications.len(),
            patient.id
        );
        Ok(prescription)
    }

    pub async fn list_prescriptions(&self, caller: &User) -> Result<Vec<Prescription>, PrescriptionError> {
        let filter = match caller.role {
            UserRole::Patient => Filter::new().eq("patient_id", caller.id.as_str()),
            UserRole::Doctor => Filter::new().eq("doctor_id", caller.id.as_str()),
            UserRole::Pharmacy => Filter::new().is_in(
                "status",
                PrescriptionStatus::pharmacy_queue().iter().map(|s| s.as_str()),
            ),
        };
        debug!("Listing prescriptions for {} {}", caller.role, caller.id);

        let documents = self
            .store
            .find(Collection::Prescriptions, &filter, FindOptions::limit(PRESCRIPTION_LIST_LIMIT))
            .await
            .map_err(|e| PrescriptionError::DatabaseError(e.to_string()))?;

        documents.into_iter().map(parse_prescription).collect()
    }

    /// Marks a prescription dispensed by the calling pharmacy.
    ///
    /// The current status is not checked: dispensing again re-stamps the pharmacy and time.
    pub async fn dispense(&self, caller: &User, prescription_id: &str) -> Result<DispenseAck, PrescriptionError> {
        if !caller.has_role(UserRole::Pharmacy) {
            return Err(PrescriptionError::OnlyPharmacy);
        }

        let mut changes = Map::new();
        changes.insert("status".to_string(), json!(PrescriptionStatus::Dispensed.as_str()));
        changes.insert("pharmacy_id".to_string(), json!(caller.id));
        changes.insert("dispensed_at".to_string(), json!(Utc::now()));

        let modified = self
            .store
            .update_one(Collection::Prescriptions, &Filter::by_id(prescription_id), changes)
            .await
            .map_err(|e| PrescriptionError::DatabaseError(e.to_string()))?;

        if modified == 0 {
            return Err(PrescriptionError::NotFound);
        }

        info!("Pharmacy {} dispensed prescription {}", caller.id, prescription_id);
        Ok(DispenseAck::default())
    }
}

fn parse_prescription(document: Value) -> Result<Prescription, PrescriptionError> {
    serde_json::from_value(document).map_err(|e| {
        warn!("Malformed prescription record: {}", e);
        PrescriptionError::DatabaseError(e.to_string())
    })
}
