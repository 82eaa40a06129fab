//! Auth Domain
//!
//! Account registration and password login for the posting application.
//!
//! # Features
//!
//! - Input sanitization and validation
//! - Username/email uniqueness checks
//! - Password hashing with Argon2id
//! - Pluggable access-token issuance
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← register / login orchestration
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┬──────────────┬──────────────┐
//! │ Repository  │ PasswordHash │ TokenIssuer  │
//! └──────┬──────┴──────────────┴──────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← inputs, User, AuthResponse
//! └─────────────┘
//! ```
//!
//! Transport (GraphQL/HTTP) lives outside this crate and maps
//! [`AuthError::code`] to its own status signals.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_auth::{AuthService, InMemoryUserRepository, RegisterInput};
//!
//! # async fn run() -> domain_auth::AuthResult<()> {
//! let service = AuthService::new(InMemoryUserRepository::new());
//!
//! let response = service
//!     .register(RegisterInput {
//!         username: "bob".into(),
//!         email: "bob@example.com".into(),
//!         password: "password".into(),
//!         confirm_password: "password".into(),
//!     })
//!     .await?;
//! println!("{}", response.access_token);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod token;
pub mod validation;

// Re-export commonly used types
pub use config::{AuthConfig, HashingConfig, TokenMode};
pub use error::{AuthError, AuthResult};
pub use models::{AuthResponse, LoginInput, RegisterInput, User};
pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres::PostgresUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::AuthService;
pub use token::{OpaqueTokenIssuer, StaticTokenIssuer, TokenIssuer};
pub use validation::Sanitize;
