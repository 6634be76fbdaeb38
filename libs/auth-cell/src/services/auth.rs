use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_database::{DocumentStore, Filter};
use shared_models::auth::TokenResponse;
use shared_models::user::User;
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password, verify_password};
use shared_utils::users::{find_user, insert_user};
use shared_utils::AppState;

use crate::models::{AuthError, LoginRequest, RegisterRequest};

pub struct AuthService {
    store: Arc<dyn DocumentStore>,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            jwt_secret: state.config.jwt_secret.clone(),
            token_ttl_hours: state.config.jwt_expiration_hours,
        }
    }

    /// Creates an account and signs the caller in.
    ///
    /// Email uniqueness is an exact, case-sensitive match. The check and the insert
    /// are separate store calls.
    pub async fn register(&self, request: RegisterRequest) -> Result<TokenResponse, AuthError> {
        debug!("Registering new {} account for: {}", request.role, request.email);

        if request.email.trim().is_empty() {
            return Err(AuthError::ValidationError("Email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AuthError::ValidationError("Password is required".to_string()));
        }

        if self.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_blocking(request.password).await?;

        let mut user = User::new(request.email, password_hash, request.full_name, request.role);
        user.phone = request.phone;
        user.specialization = request.specialization;
        user.license_number = request.license_number;

        insert_user(self.store.as_ref(), &user)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        info!("Registered user {} with role {}", user.id, user.role);
        self.token_response(&user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AuthError> {
        debug!("Login attempt for: {}", request.email);

        let user = self
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_blocking(request.password, user.password_hash.clone()).await {
            return Err(AuthError::InvalidCredentials);
        }

        self.token_response(&user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        find_user(self.store.as_ref(), &Filter::new().eq("email", email))
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    fn token_response(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let token = issue_token(&user.id, user.role, &self.jwt_secret, self.token_ttl_hours)
            .map_err(AuthError::Token)?;

        Ok(TokenResponse::bearer(token, user.summary()))
    }
}

async fn hash_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

async fn verify_blocking(password: String, hash: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            warn!("Stored password hash could not be read: {}", e);
            false
        }
        Err(e) => {
            warn!("Password verification task failed: {}", e);
            false
        }
    }
}
