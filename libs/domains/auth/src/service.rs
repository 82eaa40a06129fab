use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::models::{AuthResponse, LoginInput, RegisterInput, User};
use crate::password::{Argon2Hasher, PasswordHasher};
use crate::repository::UserRepository;
use crate::token::{issuer_for, OpaqueTokenIssuer, TokenIssuer};
use crate::validation::Sanitize;

/// Plaintext hashed once per service to equalize the unknown-email login path.
const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

/// Registration and login on top of a [`UserRepository`].
///
/// Holds no per-request state; clones share the same repository, hasher and
/// token issuer.
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    repository_timeout: Option<Duration>,
    dummy_hash: Arc<OnceCell<String>>,
}

impl<R: UserRepository> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
            repository_timeout: self.repository_timeout,
            dummy_hash: Arc::clone(&self.dummy_hash),
        }
    }
}

impl<R: UserRepository> AuthService<R> {
    /// Service with default Argon2 parameters, opaque tokens and no repository
    /// deadline.
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher: Arc::new(Argon2Hasher::default()),
            tokens: Arc::new(OpaqueTokenIssuer),
            repository_timeout: None,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Service built from configuration.
    ///
    /// The dummy hash for unknown-email logins is computed here, so the first
    /// such login costs the same as every later one.
    pub fn from_config(repository: R, config: &AuthConfig) -> AuthResult<Self> {
        let hasher = Argon2Hasher::new(&config.hashing)?;
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        let mut service = Self::new(repository).with_hasher(hasher);
        service.dummy_hash = Arc::new(OnceCell::new_with(Some(dummy_hash)));
        service.tokens = issuer_for(&config.token_mode);
        service.repository_timeout = config.repository_timeout;
        Ok(service)
    }

    pub fn with_hasher(mut self, hasher: impl PasswordHasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self.dummy_hash = Arc::new(OnceCell::new());
        self
    }

    pub fn with_token_issuer(mut self, tokens: impl TokenIssuer + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    pub fn with_repository_timeout(mut self, timeout: Duration) -> Self {
        self.repository_timeout = Some(timeout);
        self
    }

    /// Compute the dummy hash ahead of the first unknown-email login.
    ///
    /// Services built with [`AuthService::new`] or [`AuthService::with_hasher`]
    /// otherwise compute it lazily on that first login.
    pub async fn warm_up(&self) -> AuthResult<()> {
        self.ensure_dummy_hash().await.map(|_| ())
    }

    /// Register a new account.
    ///
    /// Existence checks run before hashing so that a taken username or email is
    /// reported without paying for a hash. They are advisory only: a concurrent
    /// registration can still lose at `create`, which reports the storage
    /// constraint as `UsernameTaken`/`EmailTaken`.
    #[instrument(skip_all, fields(username = %input.username.trim()))]
    pub async fn register(&self, input: RegisterInput) -> AuthResult<AuthResponse> {
        let input = input.sanitized();
        input.validate()?;

        match self
            .call("get_by_username", self.repository.get_by_username(&input.username))
            .await
        {
            Ok(_) => {
                warn!("Registration rejected: username taken");
                return Err(AuthError::UsernameTaken);
            }
            Err(AuthError::NotFound) => {}
            Err(e) => return Err(wrap("error checking username", e)),
        }

        match self
            .call("get_by_email", self.repository.get_by_email(&input.email))
            .await
        {
            Ok(_) => {
                warn!("Registration rejected: email taken");
                return Err(AuthError::EmailTaken);
            }
            Err(AuthError::NotFound) => {}
            Err(e) => return Err(wrap("error checking email", e)),
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = User::new(input.username, input.email, password_hash);

        let user = match self.call("create", self.repository.create(user)).await {
            Ok(user) => user,
            Err(e @ (AuthError::UsernameTaken | AuthError::EmailTaken)) => {
                warn!(error = %e, "Registration lost a uniqueness race");
                return Err(e);
            }
            Err(e) => return Err(wrap("error creating user", e)),
        };

        let access_token = self.tokens.issue(&user)?;

        info!(user_id = %user.id, "User registered");
        Ok(AuthResponse { access_token, user })
    }

    /// Authenticate with email and password.
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::BadCredentials`] after one password verification each.
    #[instrument(skip_all, fields(email = %input.email.trim().to_lowercase()))]
    pub async fn login(&self, input: LoginInput) -> AuthResult<AuthResponse> {
        let input = input.sanitized();
        input.validate()?;

        let user = match self
            .call("get_by_email", self.repository.get_by_email(&input.email))
            .await
        {
            Ok(user) => user,
            Err(AuthError::NotFound) => {
                self.verify_dummy(input.password).await;
                warn!("Login rejected: bad credentials");
                return Err(AuthError::BadCredentials);
            }
            Err(e) => return Err(e),
        };

        if !self
            .verify_password(input.password, user.password_hash.clone())
            .await?
        {
            warn!(user_id = %user.id, "Login rejected: bad credentials");
            return Err(AuthError::BadCredentials);
        }

        let access_token = self.tokens.issue(&user)?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResponse { access_token, user })
    }

    /// Await a repository call, bounded by the configured deadline.
    async fn call<T, F>(&self, operation: &'static str, fut: F) -> AuthResult<T>
    where
        F: Future<Output = AuthResult<T>>,
    {
        match self.repository_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                AuthError::Storage(format!("{} timed out after {:?}", operation, limit))
            })?,
            None => fut.await,
        }
    }

    // Password helpers

    async fn hash_password(&self, password: String) -> AuthResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> AuthResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {}", e)))?
    }

    async fn ensure_dummy_hash(&self) -> AuthResult<&String> {
        self.dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD.to_string()))
            .await
    }

    async fn verify_dummy(&self, password: String) {
        let result = match self.ensure_dummy_hash().await {
            Ok(hash) => self.verify_password(password, hash.clone()).await.map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            warn!(error = %e, "Dummy password verification failed");
        }
    }
}

fn wrap(context: &str, err: AuthError) -> AuthError {
    error!(error = %err, "{}", context);
    AuthError::Internal(format!("{}: {}", context, err))
}
