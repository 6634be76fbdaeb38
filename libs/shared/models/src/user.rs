use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SPECIALIZATION: &str = "General Practice";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    Doctor,
    Pharmacy,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Patient => "patient",
            UserRole::Doctor => "doctor",
            UserRole::Pharmacy => "pharmacy",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(UserRole::Patient),
            "doctor" => Ok(UserRole::Doctor),
            "pharmacy" => Ok(UserRole::Pharmacy),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Account document stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(
        email: String,
        password_hash: String,
        full_name: String,
        role: UserRole,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            full_name,
            role,
            phone: None,
            specialization: None,
            license_number: None,
            created_at: Utc::now(),
            is_active: true,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            specialization: self.specialization.clone(),
            license_number: self.license_number.clone(),
        }
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }
}

/// Public profile view; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [UserRole::Patient, UserRole::Doctor, UserRole::Pharmacy] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_summary_hides_password_hash() {
        let user = User::new(
            "a@example.com".to_string(),
            "$argon2id$secret".to_string(),
            "Alice".to_string(),
            UserRole::Patient,
        );
        let json = serde_json::to_value(user.summary()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "patient");
    }

    #[test]
    fn test_missing_active_flag_defaults_to_true() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "d@example.com",
            "password_hash": "h",
            "full_name": "Dr D",
            "role": "doctor",
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(user.is_active);
        assert!(user.specialization.is_none());
    }
}
