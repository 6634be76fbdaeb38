use serde::{Deserialize, Serialize};

use crate::user::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: String,
    pub exp: u64,
    pub iat: Option<u64>,
}

/// Returned by both registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserSummary,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: UserSummary) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}
