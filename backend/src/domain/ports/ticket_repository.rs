//! Port abstraction for ticket persistence.

use async_trait::async_trait;

use crate::domain::{NewTicket, Ticket, TicketId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// No ticket record exists for the identifier.
        NotFound { id: TicketId } => "ticket {id} not found",
        /// Repository connection could not be established.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
    }
}

/// Ticket record repository contract.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Insert a ticket with status forced to
    /// [`DEFAULT_TICKET_STATUS`](crate::domain::DEFAULT_TICKET_STATUS).
    async fn create(&self, new_ticket: NewTicket) -> Result<Ticket, TicketRepositoryError>;

    /// Fetch a ticket by identifier.
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Fetch all tickets.
    async fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Replace the status of an existing ticket and return the updated
    /// record. A missing ticket surfaces `NotFound` and writes nothing.
    async fn update_status(
        &self,
        id: TicketId,
        status: &str,
    ) -> Result<Ticket, TicketRepositoryError>;

    /// Remove a ticket record.
    async fn delete(&self, id: TicketId) -> Result<(), TicketRepositoryError>;
}
