//! Credential hashing seam
//!
//! Sensitive fields (typically `password`) are replaced by a one-way
//! hash before insert or update. The hasher is a stateless capability:
//! each call generates its own salt, so there is no process-wide
//! cryptographic state to initialize or share.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt;

/// Error raised by a hashing backend
#[derive(Debug)]
pub enum HashError {
    /// Hash computation failed
    HashingFailed { message: String },

    /// Stored value is not a parseable hash
    MalformedHash,
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashError::HashingFailed { message } => {
                write!(f, "Failed to hash credential: {}", message)
            }
            HashError::MalformedHash => write!(f, "Stored hash is malformed"),
        }
    }
}

impl std::error::Error for HashError {}

impl From<HashError> for crate::core::error::CrudError {
    fn from(err: HashError) -> Self {
        crate::core::error::CrudError::Storage {
            message: err.to_string(),
        }
    }
}

/// One-way transform for sensitive fields, with deterministic
/// verification
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext credential
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// Verify a plaintext credential against a stored hash
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError>;
}

/// Argon2id hasher with a fresh salt per call
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::HashingFailed {
                message: e.to_string(),
            })
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|_| HashError::MalformedHash)?;
        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("pw").unwrap();

        assert_ne!(hash, "pw");
        assert!(hasher.verify("pw", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_same_plaintext_different_hashes() {
        let hasher = Argon2Hasher::new();
        let h1 = hasher.hash("pw").unwrap();
        let h2 = hasher.hash("pw").unwrap();

        // Per-call salt: hashes differ, both verify.
        assert_ne!(h1, h2);
        assert!(hasher.verify("pw", &h1).unwrap());
        assert!(hasher.verify("pw", &h2).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        let hasher = Argon2Hasher::new();
        assert!(matches!(
            hasher.verify("pw", "not-a-hash"),
            Err(HashError::MalformedHash)
        ));
    }
}
