//! HS256 JWT-backed `SessionIssuer` adapter.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{SessionIssueError, SessionIssuer, SessionVerifyError};
use crate::domain::{SessionToken, UserId};

/// Default validity window for issued tokens.
pub const DEFAULT_VALIDITY_HOURS: i64 = 24;

/// Registered claims carried by every session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Asserted user id.
    sub: String,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Absolute expiry, seconds since the epoch.
    exp: i64,
}

/// Session issuer signing HS256 tokens with a symmetric process-wide key.
pub struct JwtSessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl JwtSessionIssuer {
    /// Create an issuer with an explicit validity window.
    pub fn new(key: &[u8], validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validity,
        }
    }

    /// Create an issuer with the default 24-hour window.
    pub fn with_default_validity(key: &[u8]) -> Self {
        Self::new(key, Duration::hours(DEFAULT_VALIDITY_HOURS))
    }
}

impl SessionIssuer for JwtSessionIssuer {
    fn issue(&self, user_id: UserId) -> Result<SessionToken, SessionIssueError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map(SessionToken::new)
            .map_err(|err| SessionIssueError::encoding(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, SessionVerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; no grace window.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => SessionVerifyError::expired(),
                ErrorKind::InvalidSignature => SessionVerifyError::bad_signature(),
                _ => SessionVerifyError::malformed(),
            }
        })?;

        data.claims
            .sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| SessionVerifyError::malformed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const KEY: &[u8] = b"test-signing-key-at-least-32-bytes!!";

    #[rstest]
    fn issued_tokens_verify_to_the_subject() {
        let issuer = JwtSessionIssuer::with_default_validity(KEY);
        let token = issuer.issue(UserId::new(42)).expect("token issues");
        let user_id = issuer.verify(token.as_str()).expect("token verifies");
        assert_eq!(user_id, UserId::new(42));
    }

    #[rstest]
    fn expired_tokens_are_rejected_as_expired() {
        let issuer = JwtSessionIssuer::new(KEY, Duration::hours(-1));
        let token = issuer.issue(UserId::new(42)).expect("token issues");
        let err = issuer.verify(token.as_str()).expect_err("token must be rejected");
        assert_eq!(err, SessionVerifyError::expired());
    }

    #[rstest]
    fn tokens_signed_with_another_key_are_rejected() {
        let issuer = JwtSessionIssuer::with_default_validity(KEY);
        let other = JwtSessionIssuer::with_default_validity(b"a-completely-different-signing-key");
        let token = other.issue(UserId::new(42)).expect("token issues");
        let err = issuer.verify(token.as_str()).expect_err("token must be rejected");
        assert_eq!(err, SessionVerifyError::bad_signature());
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("aaaa.bbbb.cccc")]
    fn garbage_tokens_are_malformed(#[case] token: &str) {
        let issuer = JwtSessionIssuer::with_default_validity(KEY);
        let err = issuer.verify(token).expect_err("token must be rejected");
        assert_eq!(err, SessionVerifyError::malformed());
    }

    #[rstest]
    fn two_tokens_for_the_same_user_share_the_subject() {
        let issuer = JwtSessionIssuer::with_default_validity(KEY);
        let first = issuer.issue(UserId::new(7)).expect("token issues");
        let second = issuer.issue(UserId::new(7)).expect("token issues");
        assert_eq!(
            issuer.verify(first.as_str()).expect("verifies"),
            issuer.verify(second.as_str()).expect("verifies"),
        );
    }
}
