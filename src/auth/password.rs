use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::warn;

/// Unrecoverable hashing fault. Mismatches are not errors; `verify` reports
/// them as `false`.
#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed: {0}")]
pub struct PasswordHashError(String);

/// Argon2id password hasher with explicit cost parameters
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the default cost parameters
    /// (m=19 MiB, t=2 iterations, p=1 lane).
    pub fn new() -> Self {
        let params = Params::new(19_456, 2, 1, None).expect("Invalid Argon2 params");

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash a plaintext password with a fresh random salt.
    /// Returns the PHC-format string; the salt is embedded in it.
    pub fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError(e.to_string()))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// The digest comparison is constant time. A mismatch returns `false`;
    /// so does a stored hash that fails to parse, since the caller must not
    /// be able to distinguish the two.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored password hash failed to parse: {}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
