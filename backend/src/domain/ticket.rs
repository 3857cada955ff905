//! Ticket data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;

/// Status every ticket starts in, regardless of caller input.
pub const DEFAULT_TICKET_STATUS: &str = "new";

/// Stable ticket identifier assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TicketId(i32);

impl TicketId {
    /// Wrap a storage-assigned identifier.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw integer value.
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TicketId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Support ticket record.
///
/// ## Invariants
/// - `user_id` is a weak reference to the owning user; deleting that user
///   does not cascade to the ticket.
/// - `status` is free-form text; no state machine is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    #[schema(example = 1)]
    pub id: TicketId,
    #[schema(example = 1)]
    pub user_id: UserId,
    #[schema(example = "Printer on fire")]
    pub title: String,
    #[schema(example = "Smoke is coming out of the tray.")]
    pub description: String,
    #[schema(example = "new")]
    pub status: String,
}

/// Parameters for creating a ticket. The status is not a parameter: every
/// ticket is created as [`DEFAULT_TICKET_STATUS`].
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_id_serialises_transparently() {
        let value = serde_json::to_value(TicketId::new(42)).expect("id serialises");
        assert_eq!(value, serde_json::json!(42));
    }
}
