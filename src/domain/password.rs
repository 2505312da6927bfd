//! Password value object.
//!
//! Owns hashing and verification so no other layer touches raw Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// An Argon2 password hash. Immutable, compared by value.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Never expose the hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password.
    ///
    /// # Errors
    /// Returns a validation error when the password is shorter than
    /// [`MIN_PASSWORD_LENGTH`].
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH {
            let mut errors = validator::ValidationErrors::new();
            let mut error = validator::ValidationError::new("length");
            error.message = Some(
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH).into(),
            );
            errors.add("password", error);
            return Err(AppError::Validation(errors));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap an existing hash loaded from the store.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Constant hash verified against when no stored credential exists, so
    /// missing and present accounts both cost exactly one verification.
    pub fn dummy() -> Self {
        const DUMMY_HASH: &str =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        Self {
            hash: DUMMY_HASH.to_string(),
        }
    }

    /// The hash string, for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain-text password against this hash.
    ///
    /// An unparseable hash verifies as `false` rather than erroring; this is
    /// what lets credential checks run against a dummy hash for missing users.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn restore_from_hash() {
        let plain = "TestPassword123";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn same_password_different_salts() {
        let plain = "SamePassword123";
        let first = Password::new(plain).unwrap();
        let second = Password::new(plain).unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify(plain));
        assert!(second.verify(plain));
    }

    #[test]
    fn rejects_short_password() {
        assert!(Password::new("short").is_err());
        // Exactly the minimum length is accepted
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn dummy_hash_is_constant_and_never_verifies() {
        let first = Password::dummy();
        let second = Password::dummy();

        // A fresh hash per call would salt differently (see
        // same_password_different_salts) and cost a full key derivation;
        // the dummy must stay a precomputed constant.
        assert_eq!(first.as_str(), second.as_str());
        assert!(first.as_str().starts_with("$argon2id$"));
        assert!(!first.verify("anything"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let password = Password::from_hash("not-a-real-hash".to_string());
        assert!(!password.verify("anything"));
    }
}
