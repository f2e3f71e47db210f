use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::RngCore;

use crate::error::{AppError, Result};

/// One-way password hashing with Argon2id.
///
/// Built once at startup with the configured cost and shared by cloning.
/// Every hash carries its own random salt and parameters in PHC format, so
/// verification never depends on the current cost settings.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordService {
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| AppError::Hashing(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut service = Self {
            argon2,
            dummy_hash: String::new(),
        };
        service.dummy_hash = service.hash("not-a-real-password")?;
        Ok(service)
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let mut salt_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut salt_bytes);

        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| AppError::Hashing(e.to_string()))?;

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Hashing(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Malformed hashes never match.
    pub fn verify(&self, hash: &str, plaintext: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Burn the same work as a real verification, for lookups that missed
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(&self.dummy_hash, plaintext);
    }
}

#[cfg(test)]
pub(crate) fn test_service() -> PasswordService {
    // Minimum cost keeps the test suite fast
    PasswordService::new(Params::MIN_M_COST, 1).expect("valid argon2 params")
}
