use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};

use crate::errors::InternalError;

/// Derives and verifies password hashes
///
/// Argon2id with default parameters, a random salt per hash and the
/// server-side pepper supplied as the Argon2 secret.
pub struct PasswordProvider {
    password_pepper: String,
}

impl PasswordProvider {
    /// Create a new PasswordProvider
    ///
    /// # Arguments
    /// * `password_pepper` - The secret key mixed into every hash
    pub fn new(password_pepper: String) -> Self {
        Self { password_pepper }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password
    ///
    /// # Returns
    /// * `Ok(String)` - PHC formatted hash (`$argon2id$...`)
    /// * `Err(InternalError::Crypto)` - Hasher could not be built or failed
    pub fn derive(&self, plaintext: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Check a candidate password against a stored hash
    ///
    /// A stored hash that cannot be parsed never verifies.
    pub fn verify(&self, stored_hash: &str, candidate: &str) -> Result<bool, InternalError> {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                return Ok(false);
            }
        };

        Ok(self
            .argon2()?
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl std::fmt::Debug for PasswordProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordProvider")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
