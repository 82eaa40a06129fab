use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_email_address;

/// User entity - matches SQL schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned on construction
    pub id: Uuid,
    /// Username (unique)
    pub username: String,
    /// Email, lower-cased and trimmed (unique)
    pub email: String,
    /// Argon2 password hash (never serialized)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user (password must already be hashed)
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for account registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 3))]
    pub username: String,
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
}

/// DTO for login
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response after successful login/register
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}
