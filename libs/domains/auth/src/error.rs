use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already taken")]
    EmailTaken,

    #[error("Email/password wrong combination")]
    BadCredentials,

    /// Raised by repositories when no record matches. The service translates it
    /// before it reaches a caller.
    #[error("Not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Stable machine-readable code for the transport layer.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::UsernameTaken => "username_taken",
            AuthError::EmailTaken => "email_taken",
            AuthError::BadCredentials => "bad_credentials",
            AuthError::NotFound => "not_found",
            AuthError::Storage(_) | AuthError::Internal(_) => "internal_error",
        }
    }

    /// Message that is safe to show to an end user.
    ///
    /// Storage and internal causes are logged, never returned verbatim.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Validation(details) => format!("Invalid input: {}", details),
            AuthError::UsernameTaken => "Username already taken".to_string(),
            AuthError::EmailTaken => "Email already taken".to_string(),
            AuthError::BadCredentials => "Invalid email or password".to_string(),
            AuthError::NotFound => "Not found".to_string(),
            AuthError::Storage(msg) | AuthError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }

    /// Whether the error was caused by the caller rather than by the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Storage(_) | AuthError::Internal(_))
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let codes: Vec<&str> = errs.iter().map(|e| &*e.code).collect();
                format!("{}: {}", field, codes.join(", "))
            })
            .collect();
        details.sort();

        AuthError::Validation(details.join("; "))
    }
}
