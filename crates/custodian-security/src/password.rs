//! Credential hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, Params,
};
use custodian_core::{CustodianError, CustodianResult};
use std::sync::Arc;
use tracing::debug;

/// Credential hasher using Argon2id.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher from a memory cost in MiB.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        let params = Params::new(cost.saturating_mul(1024), 2, 1, None).unwrap_or(Params::DEFAULT);
        Self::with_params(params)
    }

    /// Hashes a secret into a PHC string.
    pub fn hash(&self, secret: &str) -> CustodianResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CustodianError::Internal(format!("Failed to hash credential: {}", e)))?;

        debug!("Credential hashed");
        Ok(hash.to_string())
    }

    /// Verifies a secret against a stored PHC string.
    pub fn verify(&self, secret: &str, hash: &str) -> CustodianResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| CustodianError::Internal(format!("Invalid credential hash format: {}", e)))?;

        match self.argon2.verify_password(secret.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CustodianError::Internal(format!(
                "Credential verification error: {}",
                e
            ))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
