use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id with
/// the scheme's default cost parameters).
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh random salt.
    ///
    /// Each account gets its own salt; salts are never reused. The salt is
    /// stored alongside the account record and prepended to the plaintext
    /// before hashing.
    ///
    /// # Returns
    /// Random salt in PHC string format
    pub fn generate_salt() -> SaltString {
        SaltString::generate(&mut OsRng)
    }

    /// Hash a secret securely.
    ///
    /// Uses Argon2id with its own internal random salt generation; the
    /// caller-supplied per-account salt is part of the input string.
    ///
    /// # Arguments
    /// * `secret` - Salted plaintext to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a secret against a stored hash.
    ///
    /// Comparison goes through the scheme's own verify routine, which does
    /// not reveal timing differences between a wrong password and a
    /// mismatched hash.
    ///
    /// # Arguments
    /// * `secret` - Salted plaintext to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if the secret matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid; callers must treat
    ///   this as a failed verification, never as a retry signal
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        let argon2 = Argon2::default();

        Ok(argon2
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
