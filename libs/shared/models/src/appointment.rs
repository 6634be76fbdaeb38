use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

// No route reads or writes appointments yet; the shape is kept for stored-document compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub appointment_date: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration_minutes: i32,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_duration() -> i32 {
    30
}

impl Appointment {
    pub fn new(
        patient_id: String,
        doctor_id: String,
        patient_name: String,
        doctor_name: String,
        appointment_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            patient_id,
            doctor_id,
            patient_name,
            doctor_name,
            appointment_date,
            duration_minutes: default_duration(),
            status: AppointmentStatus::Scheduled,
            notes: None,
            created_at: Utc::now(),
        }
    }
}
