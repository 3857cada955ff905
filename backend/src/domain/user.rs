//! User data model.
//!
//! The storage record ([`User`]) carries the password secret and is never
//! serialised. Outward-facing code converts to [`UserProfile`], which has no
//! secret field at all.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum accepted password length at registration and credential update.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    InvalidEmail,
    PasswordTooShort { min: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters long")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a storage-assigned identifier.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw integer value.
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Human readable name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Globally unique, syntax-checked email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored one-way password secret in PHC string format.
///
/// Deliberately implements neither `Serialize` nor `Display`, so a secret
/// cannot end up in a response body or a log line by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordSecret(String);

impl PasswordSecret {
    /// Wrap an already-hashed secret produced by the password hasher.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Access the encoded PHC string for verification or storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordSecret(***)")
    }
}

/// Stored user record.
///
/// ## Invariants
/// - `email` is unique across all users (enforced at write time).
/// - `secret` is always a one-way hash, never a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    secret: PasswordSecret,
    admin_status: bool,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        name: UserName,
        email: EmailAddress,
        secret: PasswordSecret,
        admin_status: bool,
    ) -> Self {
        Self {
            id,
            name,
            email,
            secret,
            admin_status,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Login email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password secret.
    pub fn secret(&self) -> &PasswordSecret {
        &self.secret
    }

    /// Whether the user has been elevated to admin.
    pub fn admin_status(&self) -> bool {
        self.admin_status
    }
}

/// Outward-facing user representation.
///
/// Constructed from [`User`]; the secret field does not exist here, so no
/// serialisation path can leak it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(example = 1)]
    pub id: UserId,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub admin_status: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            admin_status: user.admin_status(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Parameters for creating a user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub secret: PasswordSecret,
}

/// Optional field changes applied by [`update`](crate::domain::ports::UserRepository::update).
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<EmailAddress>,
    pub secret: Option<PasswordSecret>,
    pub admin_status: Option<bool>,
}

impl UserUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.secret.is_none() && self.admin_status.is_none()
    }
}
