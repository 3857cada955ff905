//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod password_hasher;
mod session_issuer;
mod ticket_repository;
mod user_repository;

pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use session_issuer::{SessionIssueError, SessionIssuer, SessionVerifyError};
pub use ticket_repository::{TicketRepository, TicketRepositoryError};
pub use user_repository::{UserRepository, UserRepositoryError};
