// Password hashing using Argon2id
// Decision: Use Argon2id as it's the recommended algorithm for password hashing
// Decision: Run hashing on the blocking pool so a slow hash never stalls the runtime

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AuthError;

/// Default minimum password length
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Well-formed Argon2id hash with the default parameters that matches no password.
/// Verified against on unknown-email logins so both failure paths cost one hash.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::PasswordHasher as _;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Async password hasher with a minimum-length policy
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    min_length: usize,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PASSWORD_LENGTH)
    }
}

impl PasswordHasher {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Reject passwords shorter than the configured minimum.
    /// Length is counted in characters, not bytes.
    pub fn check_policy(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.min_length {
            return Err(AuthError::validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }

    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::internal(e.to_string()))
    }

    /// Returns `Ok(false)` on mismatch; errors only if the stored hash is unparseable.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::internal(format!("Verification task failed: {}", e)))?
            .map_err(|e| AuthError::internal(e.to_string()))
    }
}
