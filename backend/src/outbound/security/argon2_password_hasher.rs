//! Argon2id-backed `PasswordHasher` adapter.
//!
//! Secrets are PHC strings: the algorithm, parameters, and per-call random
//! salt travel with the digest, so verification needs only the stored value.
//! Both operations run on the blocking pool because Argon2 is deliberately
//! slow; request-handling threads never wait on it.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordSecret;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Password hasher using Argon2id with the crate's default work factor.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a hasher with default parameters.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordSecret, PasswordHashError> {
        let plaintext = Zeroizing::new(plaintext.to_owned());

        let encoded = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        })
        .await
        .map_err(|err| PasswordHashError::hash(err.to_string()))?
        .map_err(|err| PasswordHashError::hash(err.to_string()))?;

        Ok(PasswordSecret::new(encoded))
    }

    async fn verify(&self, plaintext: &str, secret: &PasswordSecret) -> bool {
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let secret = secret.as_str().to_owned();

        let outcome = tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&secret) else {
                // Malformed stored secret: fail closed instead of erroring.
                return false;
            };
            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
        .await;

        match outcome {
            Ok(matched) => matched,
            Err(err) => {
                tracing::error!(error = %err, "password verification task failed");
                false
            }
        }
    }
}
