//! Persistence adapters: connection pool, schema, row models, and the
//! Diesel-backed repository implementations.

mod diesel_ticket_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while bringing the schema up to date.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The database was unreachable.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    /// A migration failed to apply.
    #[error("failed to run migrations: {message}")]
    Migration { message: String },
}

/// Apply any pending migrations over a short-lived synchronous connection.
///
/// Runs before the async pool is built, so it uses Diesel's blocking
/// `PgConnection` directly.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Migration {
            message: err.to_string(),
        })?;

    Ok(())
}
