//! Credential verification and token issuance over the domain ports.
//!
//! This service is the security core: registration hashes the password
//! before anything touches storage, and login verifies a candidate against
//! the stored secret before a session token is minted. Unknown email and
//! wrong password are deliberately indistinguishable to the caller.

use std::sync::Arc;

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, SessionIssuer, UserRepository, UserRepositoryError,
};
use crate::domain::{
    CredentialUpdate, EmailAddress, Error, LoginCredentials, NewUser, Registration, SessionToken,
    User, UserId, UserUpdate,
};

/// Single rejection message for every authentication failure, so valid
/// emails cannot be enumerated through the login endpoint.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Map credential-store failures onto transport-agnostic domain errors.
pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateEmail { .. } => Error::conflict("Email already Registered"),
        UserRepositoryError::NotFound { .. } => Error::not_found("User not found"),
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    let PasswordHashError::Hash { message } = error;
    Error::internal(format!("password hashing failed: {message}"))
}

/// Orchestrates the credential store, password hasher, and session issuer.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    sessions: Arc<dyn SessionIssuer>,
}

impl AuthService {
    /// Assemble the service from its ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            sessions,
        }
    }

    /// Hash the password and create the user record. A duplicate email is a
    /// conflict and leaves storage unchanged.
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        let secret = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;

        let new_user = NewUser {
            name: registration.name().clone(),
            email: registration.email().clone(),
            secret,
        };

        self.users
            .create(new_user)
            .await
            .map_err(map_user_repository_error)
    }

    /// Verify credentials and mint a session token for the matched user.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, Error> {
        // A syntactically invalid email cannot match a stored record; reject
        // it with the same message as any other failed attempt.
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?;

        let Some(user) = user else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify(credentials.password(), user.secret()).await {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        self.sessions
            .issue(user.id())
            .map_err(|err| Error::internal(format!("failed to issue session token: {err}")))
    }

    /// Replace a user's email and password, re-hashing the new password.
    pub async fn update_credentials(
        &self,
        id: UserId,
        update: CredentialUpdate,
    ) -> Result<User, Error> {
        let secret = self
            .hasher
            .hash(update.password())
            .await
            .map_err(map_hash_error)?;

        let fields = UserUpdate {
            email: Some(update.email().clone()),
            secret: Some(secret),
            admin_status: None,
        };

        self.users
            .update(id, fields)
            .await
            .map_err(map_user_repository_error)
    }
}
