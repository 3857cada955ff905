//! Port abstraction for the credential store (user persistence).

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId, UserUpdate};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// The email address is already registered.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// No user record exists for the identifier.
        NotFound { id: UserId } => "user {id} not found",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Credential store contract. All mutations are durable before the call
/// returns; email uniqueness is enforced at write time.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user record, failing on a duplicate email without mutating
    /// storage.
    async fn create(&self, new_user: NewUser) -> Result<User, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Apply the non-`None` fields of `update` to an existing record and
    /// return the updated record.
    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, UserRepositoryError>;

    /// Remove a user record.
    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError>;

    /// Fetch all user records.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;
}
