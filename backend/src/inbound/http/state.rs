//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AuthService;
use crate::domain::ports::{SessionIssuer, TicketRepository, UserRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential verification and token issuance.
    pub auth: AuthService,
    /// Credential store for direct record operations.
    pub users: Arc<dyn UserRepository>,
    /// Ticket record repository.
    pub tickets: Arc<dyn TicketRepository>,
    /// Token verification for the bearer-auth extractor.
    pub sessions: Arc<dyn SessionIssuer>,
}

impl HttpState {
    /// Bundle the port implementations for the handlers.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tickets: Arc<dyn TicketRepository>,
        hasher: Arc<dyn crate::domain::ports::PasswordHasher>,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self {
        Self {
            auth: AuthService::new(users.clone(), hasher, sessions.clone()),
            users,
            tickets,
            sessions,
        }
    }
}
