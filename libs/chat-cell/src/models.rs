use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::user::{User, UserRole};

pub const CHAT_LIST_LIMIT: usize = 100;
pub const MESSAGE_LIST_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    #[default]
    Active,
    // Nothing closes a chat yet.
    Closed,
}

impl ChatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStatus::Active => "active",
            ChatStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    #[serde(default)]
    pub status: ChatStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_time: Option<DateTime<Utc>>,
}

impl Chat {
    /// Names are copied at creation and never refreshed.
    pub fn new(patient: &User, doctor: &User) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            patient_id: patient.id.clone(),
            doctor_id: doctor.id.clone(),
            patient_name: patient.full_name.clone(),
            doctor_name: doctor.full_name.clone(),
            status: ChatStatus::Active,
            created_at: Utc::now(),
            last_message: None,
            last_message_time: None,
        }
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.patient_id == user_id || self.doctor_id == user_id
    }

    /// The participant who is not `user_id`.
    pub fn counterpart_of(&self, user_id: &str) -> &str {
        if self.patient_id == user_id {
            &self.doctor_id
        } else {
            &self.patient_id
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Prescription,
    Appointment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_role: UserRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message_type: MessageType,
}

impl Message {
    pub fn text(chat_id: &str, sender: &User, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.to_string(),
            sender_id: sender.id.clone(),
            sender_name: sender.full_name.clone(),
            sender_role: sender.role,
            content,
            timestamp: Utc::now(),
            message_type: MessageType::Text,
        }
    }
}

/// Frame pushed to the other participant's live connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    NewMessage { message: Message },
}

#[derive(Debug, Deserialize)]
pub struct CreateChatQuery {
    pub doctor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageQuery {
    pub content: String,
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Only patients can start chats")]
    OnlyPatients,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Chat not found")]
    ChatNotFound,

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::OnlyPatients | ChatError::NotAuthorized => AppError::Forbidden(err.to_string()),
            ChatError::DoctorNotFound | ChatError::ChatNotFound => AppError::NotFound(err.to_string()),
            ChatError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, role: UserRole) -> User {
        let mut user = User::new(format!("{}@example.com", id), "h".into(), id.to_uppercase(), role);
        user.id = id.to_string();
        user
    }

    #[test]
    fn test_counterpart_of_each_participant() {
        let chat = Chat::new(&user("p1", UserRole::Patient), &user("d1", UserRole::Doctor));

        assert_eq!(chat.counterpart_of("p1"), "d1");
        assert_eq!(chat.counterpart_of("d1"), "p1");
        assert!(chat.is_participant("p1"));
        assert!(!chat.is_participant("x"));
        assert_eq!(chat.patient_name, "P1");
        assert_eq!(chat.status, ChatStatus::Active);
    }

    #[test]
    fn test_new_message_event_shape() {
        let sender = user("p1", UserRole::Patient);
        let message = Message::text("c1", &sender, "hello".to_string());
        let event = serde_json::to_value(ChatEvent::NewMessage { message }).unwrap();

        assert_eq!(event["type"], "new_message");
        assert_eq!(event["message"]["content"], "hello");
        assert_eq!(event["message"]["sender_role"], "patient");
        assert_eq!(event["message"]["message_type"], "text");
    }
}
