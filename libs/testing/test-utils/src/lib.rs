//! Shared test utilities for domain testing
//!
//! `TestDataBuilder` generates deterministic, per-test account data so tests
//! sharing one store never collide on unique columns.
//!
//! ```
//! use test_utils::TestDataBuilder;
//!
//! let builder = TestDataBuilder::from_test_name("test_register");
//! let username = builder.username("main");
//! let email = builder.email("main");
//! assert!(email.ends_with("@example.com"));
//! ```

/// Builder for test data with deterministic randomization
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Username unique to this builder and `suffix`
    pub fn username(&self, suffix: &str) -> String {
        format!("user_{:x}_{}", self.seed, suffix)
    }

    /// Lower-case email unique to this builder and `suffix`
    pub fn email(&self, suffix: &str) -> String {
        format!("{}@example.com", self.username(suffix).to_lowercase())
    }

    /// Password that satisfies the registration rules
    pub fn password(&self) -> String {
        format!("pw-{:016x}", self.seed)
    }
}
