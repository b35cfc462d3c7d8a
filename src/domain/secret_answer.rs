//! Secret answer value object.
//!
//! Answers to the recovery question are credentials and get the same
//! treatment as passwords: hashed with Argon2, never stored or
//! serialized in plain text. Unlike passwords, answers are normalized
//! before hashing so that casing and stray whitespace do not lock a
//! user out of recovery.

use crate::domain::Password;
use crate::errors::ApiResult;

/// Hashed secret answer, compared only through normalized verification.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretAnswer {
    hash: String,
}

impl std::fmt::Debug for SecretAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretAnswer")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl SecretAnswer {
    /// Normalize and hash a plain text answer.
    pub fn new(plain_text: &str) -> ApiResult<Self> {
        let normalized = Self::normalize(plain_text);
        let hash = Password::new(&normalized)?.into_string();
        Ok(Self { hash })
    }

    /// Rebuild from a stored hash.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text answer, applying the same normalization
    /// that was applied when the answer was stored.
    pub fn verify(&self, plain_text: &str) -> bool {
        let normalized = Self::normalize(plain_text);
        Password::from_hash(self.hash.clone()).verify(&normalized)
    }

    /// Trim, collapse inner whitespace and lowercase.
    fn normalize(raw: &str) -> String {
        raw.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl From<SecretAnswer> for String {
    fn from(answer: SecretAnswer) -> Self {
        answer.hash
    }
}
