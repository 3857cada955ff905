//! Authentication payloads: login credentials, registration, and credential
//! updates.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Plaintext passwords are held in [`Zeroizing`] wrappers so they are wiped
//! from memory on drop.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, MIN_PASSWORD_LENGTH, UserName, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the auth service.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming. Syntax is not
///   checked here: login compares against stored records, and a
///   syntactically invalid email simply matches nothing.
/// - `password` must be non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct Registration {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration inputs: non-blank name, well-formed email,
    /// and a password of at least [`MIN_PASSWORD_LENGTH`] characters.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        let name = UserName::new(name)?;
        let email = EmailAddress::new(email)?;
        let password = validate_password(password)?;

        Ok(Self {
            name,
            email,
            password,
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated replacement credentials for an existing user.
#[derive(Debug, Clone)]
pub struct CredentialUpdate {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl CredentialUpdate {
    /// Validate raw inputs with the same rules as registration.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        let email = EmailAddress::new(email)?;
        let password = validate_password(password)?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn validate_password(password: &str) -> Result<Zeroizing<String>, UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Signed session token asserting a user identity until its expiry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an encoded token produced by the session issuer.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Access the encoded token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "password123", LoginValidationError::EmptyEmail)]
    #[case("   ", "password123", LoginValidationError::EmptyEmail)]
    #[case("alice@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_login_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_credentials_trim_email_only() {
        let creds = LoginCredentials::try_from_parts("  alice@example.com ", " pw ")
            .expect("valid credentials");
        assert_eq!(creds.email(), "alice@example.com");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    #[case("", "alice@example.com", "password123")]
    #[case("Alice", "not-an-email", "password123")]
    #[case("Alice", "alice@example.com", "short")]
    fn invalid_registrations(#[case] name: &str, #[case] email: &str, #[case] password: &str) {
        assert!(Registration::try_from_parts(name, email, password).is_err());
    }

    #[rstest]
    fn password_length_counts_characters_not_bytes() {
        // Eight multi-byte characters satisfy the minimum.
        let registration = Registration::try_from_parts("Alice", "alice@example.com", "pässwörd");
        assert!(registration.is_ok());
    }

    #[rstest]
    fn credential_update_applies_registration_rules() {
        assert!(CredentialUpdate::try_from_parts("new@example.com", "longenough").is_ok());
        assert!(CredentialUpdate::try_from_parts("new@example.com", "short").is_err());
        assert!(CredentialUpdate::try_from_parts("bad-email", "longenough").is_err());
    }
}
