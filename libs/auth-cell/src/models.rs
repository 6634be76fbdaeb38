use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::user::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    // Unknown email and wrong password deliberately share one message.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("{0}")]
    ValidationError(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token issuance failed: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail | AuthError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::DatabaseError(msg) => AppError::Database(msg),
            AuthError::PasswordHash(_) | AuthError::Token(_) => AppError::Internal(err.to_string()),
        }
    }
}
