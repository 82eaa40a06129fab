//! Input hygiene for registration and login.
//!
//! Inputs are normalized with [`Sanitize`] and then checked with the
//! `validator::Validate` impls derived in [`crate::models`]. Both steps are pure.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{LoginInput, RegisterInput};

/// Exactly one `@`, non-empty local part, dotted domain, no whitespace.
static EMAIL_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").unwrap());

/// Custom validator for email addresses
pub(crate) fn validate_email_address(email: &str) -> Result<(), validator::ValidationError> {
    if !EMAIL_ADDRESS.is_match(email) {
        return Err(validator::ValidationError::new("invalid_email"));
    }
    Ok(())
}

/// Normalization applied to raw input before validation or any use.
pub trait Sanitize {
    /// Normalize in place. Must be idempotent.
    fn sanitize(&mut self);

    /// Owned variant of [`Sanitize::sanitize`].
    fn sanitized(mut self) -> Self
    where
        Self: Sized,
    {
        self.sanitize();
        self
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Sanitize for RegisterInput {
    fn sanitize(&mut self) {
        self.username = self.username.trim().to_string();
        self.email = normalize_email(&self.email);
    }
}

impl Sanitize for LoginInput {
    fn sanitize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}
