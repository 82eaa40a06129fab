use std::fmt::Debug;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::TokenMode;
use crate::error::AuthResult;
use crate::models::User;

/// Issues the access token returned with every successful authentication.
///
/// Implementations own the token format; the service only passes the opaque
/// string through.
pub trait TokenIssuer: Send + Sync + Debug {
    fn issue(&self, user: &User) -> AuthResult<String>;
}

/// Returns the same placeholder token for every user
#[derive(Debug, Clone)]
pub struct StaticTokenIssuer {
    token: String,
}

impl StaticTokenIssuer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenIssuer for StaticTokenIssuer {
    fn issue(&self, _user: &User) -> AuthResult<String> {
        Ok(self.token.clone())
    }
}

/// Random 128-bit opaque token, hex encoded
#[derive(Debug, Clone, Default)]
pub struct OpaqueTokenIssuer;

impl TokenIssuer for OpaqueTokenIssuer {
    fn issue(&self, user: &User) -> AuthResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        tracing::debug!(user_id = %user.id, "Issued access token");
        Ok(token)
    }
}

pub(crate) fn issuer_for(mode: &TokenMode) -> Arc<dyn TokenIssuer> {
    match mode {
        TokenMode::Opaque => Arc::new(OpaqueTokenIssuer),
        TokenMode::Static(token) => Arc::new(StaticTokenIssuer::new(token.clone())),
    }
}
