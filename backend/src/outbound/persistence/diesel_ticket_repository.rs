//! PostgreSQL-backed `TicketRepository` implementation using Diesel.
//!
//! `update_status` and `delete` surface `NotFound` for missing records
//! instead of silently doing nothing.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{DEFAULT_TICKET_STATUS, NewTicket, Ticket, TicketId, UserId};

use super::models::{NewTicketRow, TicketRow};
use super::pool::{DbPool, PoolError};
use super::schema::tickets;

/// Diesel-backed implementation of the `TicketRepository` port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain ticket repository errors.
fn map_pool_error(error: PoolError) -> TicketRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TicketRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain ticket repository errors.
fn map_diesel_error(error: diesel::result::Error) -> TicketRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TicketRepositoryError::connection("database connection error")
        }
        _ => TicketRepositoryError::query("database error"),
    }
}

/// Convert a database row to a domain [`Ticket`].
fn row_to_ticket(row: TicketRow) -> Ticket {
    Ticket {
        id: TicketId::new(row.id),
        user_id: UserId::new(row.user_id),
        title: row.title,
        description: row.description,
        status: row.status,
    }
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn create(&self, new_ticket: NewTicket) -> Result<Ticket, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewTicketRow {
            user_id: new_ticket.user_id.as_i32(),
            title: &new_ticket.title,
            description: &new_ticket.description,
            status: DEFAULT_TICKET_STATUS,
        };

        let inserted: TicketRow = diesel::insert_into(tickets::table)
            .values(&row)
            .returning(TicketRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_ticket(inserted))
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = tickets::table
            .find(id.as_i32())
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_ticket))
    }

    async fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = tickets::table
            .order(tickets::id.asc())
            .select(TicketRow::as_select())
            .load::<TicketRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_ticket).collect())
    }

    async fn update_status(
        &self,
        id: TicketId,
        status: &str,
    ) -> Result<Ticket, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated: TicketRow = diesel::update(tickets::table.find(id.as_i32()))
            .set(tickets::status.eq(status))
            .returning(TicketRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if matches!(err, diesel::result::Error::NotFound) {
                    TicketRepositoryError::not_found(id)
                } else {
                    map_diesel_error(err)
                }
            })?;

        Ok(row_to_ticket(updated))
    }

    async fn delete(&self, id: TicketId) -> Result<(), TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(tickets::table.find(id.as_i32()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if removed == 0 {
            return Err(TicketRepositoryError::not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Mapping coverage; query execution is exercised against a live
    //! database only.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn rows_convert_to_domain_tickets() {
        let ticket = row_to_ticket(TicketRow {
            id: 3,
            user_id: 7,
            title: "Printer on fire".to_owned(),
            description: "Smoke everywhere".to_owned(),
            status: DEFAULT_TICKET_STATUS.to_owned(),
            created_at: Utc::now(),
        });

        assert_eq!(ticket.id, TicketId::new(3));
        assert_eq!(ticket.user_id, UserId::new(7));
        assert_eq!(ticket.status, "new");
    }

    #[rstest]
    fn pool_errors_map_to_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, TicketRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn generic_diesel_errors_map_to_query_failures() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(err, TicketRepositoryError::query("database error"));
    }
}
