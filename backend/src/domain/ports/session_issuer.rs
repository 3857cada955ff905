//! Port abstraction for session token issuance and verification.

use crate::domain::{SessionToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised while minting a session token.
    pub enum SessionIssueError {
        /// Token encoding or signing failed.
        Encoding { message: String } => "session token encoding failed: {message}",
    }
}

define_port_error! {
    /// Reasons a presented session token is rejected.
    ///
    /// Callers at the HTTP boundary must collapse all three into one generic
    /// rejection so the reason is never disclosed to the client.
    pub enum SessionVerifyError {
        /// The token's expiry lies in the past.
        Expired => "session token expired",
        /// The token could not be decoded at all.
        Malformed => "session token malformed",
        /// The signature does not match the configured key.
        BadSignature => "session token signature mismatch",
    }
}

/// Mints and verifies signed, time-bounded identity assertions.
///
/// Token operations are pure computation over the signing key, so the trait
/// is synchronous. There is no revocation list: a token stays valid from
/// issuance until its expiry.
pub trait SessionIssuer: Send + Sync {
    /// Produce a signed token asserting `user_id` until the configured
    /// validity window elapses.
    fn issue(&self, user_id: UserId) -> Result<SessionToken, SessionIssueError>;

    /// Check a presented token and return the asserted user id.
    fn verify(&self, token: &str) -> Result<UserId, SessionVerifyError>;
}
