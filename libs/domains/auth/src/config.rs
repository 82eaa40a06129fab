use core_config::{env_optional, env_or_default, env_parse, ConfigError, FromEnv};
use std::time::Duration;

/// Argon2 cost parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HashingConfig {
    /// Argon2id with 19 MiB, 3 passes and 1 lane.
    ///
    /// A release build measured about 73 ms per hash at 2 passes, so 3 passes
    /// lands near 110 ms, inside the 100-250 ms target for interactive login.
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 3,
            parallelism: 1,
        }
    }
}

/// How access tokens are minted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenMode {
    /// Random opaque token per response
    Opaque,
    /// Fixed placeholder token
    Static(String),
}

/// Authentication service configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub hashing: HashingConfig,
    /// Deadline applied to every repository call
    pub repository_timeout: Option<Duration>,
    pub token_mode: TokenMode,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hashing: HashingConfig::default(),
            repository_timeout: None,
            token_mode: TokenMode::Opaque,
        }
    }
}

impl FromEnv for AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = HashingConfig::default();
        let hashing = HashingConfig {
            memory_kib: env_parse("AUTH_ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_parse("AUTH_ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: env_parse("AUTH_ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        let repository_timeout = match env_optional("AUTH_REPOSITORY_TIMEOUT_MS") {
            Some(raw) => {
                let millis = raw.parse::<u64>().map_err(|e| ConfigError::ParseError {
                    key: "AUTH_REPOSITORY_TIMEOUT_MS".to_string(),
                    details: e.to_string(),
                })?;
                Some(Duration::from_millis(millis))
            }
            None => None,
        };

        let token_mode = match env_or_default("AUTH_TOKEN_MODE", "opaque").to_lowercase().as_str() {
            "opaque" => TokenMode::Opaque,
            "static" => TokenMode::Static(env_or_default("AUTH_STATIC_TOKEN", "a token")),
            other => {
                return Err(ConfigError::ParseError {
                    key: "AUTH_TOKEN_MODE".to_string(),
                    details: format!("unknown token mode '{}', expected 'opaque' or 'static'", other),
                });
            }
        };

        Ok(Self {
            hashing,
            repository_timeout,
            token_mode,
        })
    }
}
