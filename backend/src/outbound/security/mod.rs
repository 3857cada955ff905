//! Security adapters: password hashing and session token signing.

mod argon2_password_hasher;
mod jwt_session_issuer;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_session_issuer::{DEFAULT_VALIDITY_HOURS, JwtSessionIssuer};
