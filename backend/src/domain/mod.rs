//! Domain primitives, aggregates, ports, and the authentication service.
//!
//! Purpose: define strongly typed domain entities used by the HTTP and
//! persistence layers. Types are immutable; invariants and serialisation
//! contracts (serde) are documented on each type.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod ticket;
pub mod user;

pub use self::auth::{
    CredentialUpdate, LoginCredentials, LoginValidationError, Registration, SessionToken,
};
pub use self::auth_service::{AuthService, INVALID_CREDENTIALS};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ticket::{DEFAULT_TICKET_STATUS, NewTicket, Ticket, TicketId};
pub use self::user::{
    EmailAddress, MIN_PASSWORD_LENGTH, NewUser, PasswordSecret, User, UserId, UserName,
    UserProfile, UserUpdate, UserValidationError,
};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
