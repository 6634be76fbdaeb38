use anyhow::Result;
use serde_json::Value;

use shared_database::{Collection, DocumentStore, Filter};
use shared_models::user::{User, UserRole};

pub async fn find_user(store: &dyn DocumentStore, filter: &Filter) -> Result<Option<User>> {
    store
        .find_one(Collection::Users, filter)
        .await?
        .map(serde_json::from_value::<User>)
        .transpose()
        .map_err(Into::into)
}

pub async fn find_user_by_id(store: &dyn DocumentStore, user_id: &str) -> Result<Option<User>> {
    find_user(store, &Filter::by_id(user_id)).await
}

/// Looks up a user that must also hold `role`; a user with another role is reported as absent.
pub async fn find_user_with_role(
    store: &dyn DocumentStore,
    user_id: &str,
    role: UserRole,
) -> Result<Option<User>> {
    find_user(store, &Filter::by_id(user_id).eq("role", role.as_str())).await
}

pub async fn insert_user(store: &dyn DocumentStore, user: &User) -> Result<()> {
    let document: Value = serde_json::to_value(user)?;
    store.insert(Collection::Users, document).await
}
