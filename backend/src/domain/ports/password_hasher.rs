//! Port abstraction for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PasswordSecret;

use super::define_port_error;

define_port_error! {
    /// Failures raised while producing a password secret.
    pub enum PasswordHashError {
        /// The hashing computation itself failed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// One-way password transform and verification.
///
/// `hash` must be non-deterministic: a per-call random salt makes two hashes
/// of the same plaintext differ, and the salt and parameters are encoded in
/// the secret so `verify` needs only the stored value. The trait is async so
/// implementations can offload the deliberately slow computation to a
/// blocking pool.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Transform a plaintext password into a salted one-way secret.
    async fn hash(&self, plaintext: &str) -> Result<PasswordSecret, PasswordHashError>;

    /// Check a plaintext candidate against a stored secret. Malformed
    /// secrets yield `false`, never an error.
    async fn verify(&self, plaintext: &str, secret: &PasswordSecret) -> bool;
}
