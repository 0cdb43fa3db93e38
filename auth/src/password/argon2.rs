use argon2::password_hash;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

const DECOY_PASSWORD: &str = "decoy-password-never-matches";

/// Peppered password hashing.
///
/// Every password is prefixed with a server-side pepper before it reaches
/// Argon2id, so a leaked hash table alone is not enough for an offline
/// dictionary attack. The salt and cost parameters travel inside the PHC
/// string, the pepper never does.
pub struct PasswordHasher {
    pepper: Vec<u8>,
    decoy_hash: Option<String>,
}

impl PasswordHasher {
    /// Create a new password hasher with the given pepper.
    ///
    /// The decoy hash is computed here, so no request ever pays for it.
    ///
    /// # Arguments
    /// * `pepper` - Server-side secret prepended to every password
    ///
    /// # Returns
    /// PasswordHasher using Argon2id with the crate's default cost parameters
    pub fn new(pepper: impl AsRef<[u8]>) -> Self {
        let mut hasher = Self {
            pepper: pepper.as_ref().to_vec(),
            decoy_hash: None,
        };

        hasher.decoy_hash = match hasher.hash(DECOY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::error!(error = %e, "Failed to compute decoy password hash");
                None
            }
        };

        hasher
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string (algorithm, parameters, salt and digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(&self.peppered(password), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A malformed or non-Argon2 hash is reported as a mismatch and still
    /// costs one full verification (against the decoy), so callers cannot
    /// tell a corrupt record from a wrong password by result or by latency.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let outcome = PasswordHash::new(hash)
            .and_then(|parsed_hash| self.verify_parsed(password, &parsed_hash));

        match outcome {
            Ok(()) => true,
            Err(password_hash::Error::Password) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is unusable");
                self.verify_decoy(password)
            }
        }
    }

    /// Burn one full verification against a throwaway hash.
    ///
    /// Always returns `false`. Used when the account does not exist so that
    /// the unknown-user path costs the same as the wrong-password path.
    pub fn verify_decoy(&self, password: &str) -> bool {
        if let Some(parsed_hash) = self
            .decoy_hash
            .as_deref()
            .and_then(|hash| PasswordHash::new(hash).ok())
        {
            let _ = self.verify_parsed(password, &parsed_hash);
        }

        false
    }

    fn verify_parsed(
        &self,
        password: &str,
        parsed_hash: &PasswordHash<'_>,
    ) -> password_hash::Result<()> {
        Argon2::default().verify_password(&self.peppered(password), parsed_hash)
    }

    fn peppered(&self, password: &str) -> Vec<u8> {
        let mut input = Vec::with_capacity(self.pepper.len() + password.len());
        input.extend_from_slice(&self.pepper);
        input.extend_from_slice(password.as_bytes());
        input
    }
}
