use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::user::User;

pub const PRESCRIPTION_LIST_LIMIT: usize = 100;

pub const DISPENSED_MESSAGE: &str = "Prescription dispensed successfully";

/// Free-form medication entry (name, dosage, frequency...). Stored as sent.
pub type Medication = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    #[default]
    Pending,
    Dispensed,
    Collected,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Pending => "pending",
            PrescriptionStatus::Dispensed => "dispensed",
            PrescriptionStatus::Collected => "collected",
        }
    }

    /// Statuses a pharmacy works through.
    pub fn pharmacy_queue() -> [PrescriptionStatus; 2] {
        [PrescriptionStatus::Pending, PrescriptionStatus::Dispensed]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    #[serde(default)]
    pub pharmacy_id: Option<String>,
    pub patient_name: String,
    pub doctor_name: String,
    #[serde(default)]
    pub medications: Vec<Medication>,
    pub diagnosis: String,
    pub instructions: String,
    #[serde(default)]
    pub status: PrescriptionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub dispensed_at: Option<DateTime<Utc>>,
}

impl Prescription {
    pub fn new(
        doctor: &User,
        patient: &User,
        medications: Vec<Medication>,
        diagnosis: String,
        instructions: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            patient_id: patient.id.clone(),
            doctor_id: doctor.id.clone(),
            pharmacy_id: None,
            patient_name: patient.full_name.clone(),
            doctor_name: doctor.full_name.clone(),
            medications,
            diagnosis,
            instructions,
            status: PrescriptionStatus::Pending,
            created_at: Utc::now(),
            dispensed_at: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePrescriptionQuery {
    pub patient_id: String,
    pub diagnosis: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispenseAck {
    pub message: String,
}

impl Default for DispenseAck {
    fn default() -> Self {
        Self {
            message: DISPENSED_MESSAGE.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PrescriptionError {
    #[error("Only doctors can create prescriptions")]
    OnlyDoctors,

    #[error("Only pharmacy can dispense prescriptions")]
    OnlyPharmacy,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Prescription not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PrescriptionError> for AppError {
    fn from(err: PrescriptionError) -> Self {
        match err {
            PrescriptionError::OnlyDoctors | PrescriptionError::OnlyPharmacy => {
                AppError::Forbidden(err.to_string())
            }
            PrescriptionError::PatientNotFound | PrescriptionError::NotFound => {
                AppError::NotFound(err.to_string())
            }
            PrescriptionError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
