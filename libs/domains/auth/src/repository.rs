use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::User;

/// Repository trait for User persistence.
///
/// Lookups fail with [`AuthError::NotFound`] when nothing matches and with
/// [`AuthError::Storage`] for any other failure. `create` reports a violated
/// uniqueness constraint as [`AuthError::UsernameTaken`] or
/// [`AuthError::EmailTaken`]; the backing store is the source of truth for
/// uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by exact username
    async fn get_by_username(&self, username: &str) -> AuthResult<User>;

    /// Get a user by (normalized) email
    async fn get_by_email(&self, email: &str) -> AuthResult<User>;

    /// Persist a new user and return the stored record
    async fn create(&self, user: User) -> AuthResult<User>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_username(&self, username: &str) -> AuthResult<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(AuthError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> AuthResult<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or(AuthError::NotFound)
    }

    async fn create(&self, user: User) -> AuthResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameTaken);
        }

        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AuthError::EmailTaken);
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }
}
