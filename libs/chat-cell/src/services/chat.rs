use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use doctor_cell::{DoctorError, DoctorService};
use shared_database::{Collection, DocumentStore, Filter, FindOptions, SortOrder};
use shared_models::user::{User, UserRole};
use shared_realtime::{ConnectionRegistry, Delivery};
use shared_utils::AppState;

use crate::models::{
    Chat, ChatError, ChatEvent, ChatStatus, Message, CHAT_LIST_LIMIT, MESSAGE_LIST_LIMIT,
};

pub struct ChatService {
    store: Arc<dyn DocumentStore>,
    registry: ConnectionRegistry,
    doctors: DoctorService,
}

impl ChatService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            registry: state.registry.clone(),
            doctors: DoctorService::new(state),
        }
    }

    /// Opens a chat between a patient and a doctor, or returns the active one they already share.
    pub async fn create_chat(&self, caller: &User, doctor_id: &str) -> Result<Chat, ChatError> {
        if !caller.has_role(UserRole::Patient) {
            return Err(ChatError::OnlyPatients);
        }

        let doctor = self.doctors.get_doctor(doctor_id).await.map_err(|e| match e {
            DoctorError::NotFound => ChatError::DoctorNotFound,
            DoctorError::DatabaseError(msg) => ChatError::DatabaseError(msg),
        })?;

        let existing = Filter::new()
            .eq("patient_id", caller.id.as_str())
            .eq("doctor_id", doctor.id.as_str())
            .eq("status", ChatStatus::Active.as_str());

        if let Some(chat) = self.find_one::<Chat>(Collection::Chats, &existing).await? {
            debug!("Reusing active chat {} for patient {} and doctor {}", chat.id, caller.id, doctor.id);
            return Ok(chat);
        }

        let chat = Chat::new(caller, &doctor);
        self.insert(Collection::Chats, &chat).await?;

        info!("Created chat {} between patient {} and doctor {}", chat.id, caller.id, doctor.id);
        Ok(chat)
    }

    pub async fn list_chats(&self, caller: &User) -> Result<Vec<Chat>, ChatError> {
        let filter = match caller.role {
            UserRole::Patient => Filter::new().eq("patient_id", caller.id.as_str()),
            UserRole::Doctor => Filter::new().eq("doctor_id", caller.id.as_str()),
            UserRole::Pharmacy => return Err(ChatError::NotAuthorized),
        };

        self.find(Collection::Chats, &filter, FindOptions::limit(CHAT_LIST_LIMIT))
            .await
    }

    /// Loads a chat the caller takes part in. A missing chat wins over a foreign one.
    pub async fn get_chat_for(&self, caller: &User, chat_id: &str) -> Result<Chat, ChatError> {
        let chat = self
            .find_one::<Chat>(Collection::Chats, &Filter::by_id(chat_id))
            .await?
            .ok_or(ChatError::ChatNotFound)?;

        if !chat.is_participant(&caller.id) {
            return Err(ChatError::NotAuthorized);
        }

        Ok(chat)
    }

    pub async fn list_messages(&self, caller: &User, chat_id: &str) -> Result<Vec<Message>, ChatError> {
        let chat = self.get_chat_for(caller, chat_id).await?;

        let options = FindOptions::limit(MESSAGE_LIST_LIMIT).sort_by("timestamp", SortOrder::Ascending);
        self.find(Collection::Messages, &Filter::new().eq("chat_id", chat.id.as_str()), options)
            .await
    }

    /// Stores the message, refreshes the chat's last-message fields and pushes the
    /// message to the other participant. The push outcome never affects the result.
    pub async fn send_message(
        &self,
        caller: &User,
        chat_id: &str,
        content: String,
    ) -> Result<Message, ChatError> {
        let chat = self.get_chat_for(caller, chat_id).await?;

        let message = Message::text(&chat.id, caller, content);
        self.insert(Collection::Messages, &message).await?;

        // Not atomic with the insert above; a failure here leaves a stale preview only.
        let mut changes = Map::new();
        changes.insert("last_message".to_string(), json!(message.content));
        changes.insert("last_message_time".to_string(), json!(message.timestamp));
        self.store
            .update_one(Collection::Chats, &Filter::by_id(&chat.id), changes)
            .await
            .map_err(|e| ChatError::DatabaseError(e.to_string()))?;

        let recipient = chat.counterpart_of(&caller.id);
        let event = ChatEvent::NewMessage { message: message.clone() };
        match serde_json::to_value(&event) {
            Ok(payload) => {
                if self.registry.notify(recipient, &payload).await == Delivery::Sent {
                    debug!("Pushed message {} to {}", message.id, recipient);
                }
            }
            Err(e) => debug!("Could not encode push for message {}: {}", message.id, e),
        }

        Ok(message)
    }

    async fn insert<T: serde::Serialize>(&self, collection: Collection, record: &T) -> Result<(), ChatError> {
        let document = serde_json::to_value(record).map_err(|e| ChatError::DatabaseError(e.to_string()))?;
        self.store
            .insert(collection, document)
            .await
            .map_err(|e| ChatError::DatabaseError(e.to_string()))
    }

    async fn find<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<T>, ChatError> {
        self.store
            .find(collection, filter, options)
            .await
            .map_err(|e| ChatError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(|doc: Value| serde_json::from_value(doc).map_err(|e| ChatError::DatabaseError(e.to_string())))
            .collect()
    }

    async fn find_one<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<T>, ChatError> {
        self.store
            .find_one(collection, filter)
            .await
            .map_err(|e| ChatError::DatabaseError(e.to_string()))?
            .map(|doc| serde_json::from_value(doc).map_err(|e| ChatError::DatabaseError(e.to_string())))
            .transpose()
    }
}
