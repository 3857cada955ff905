//! Test utilities: in-memory repository adapters and app builders.
//!
//! Compiled for unit tests and, via the `test-support` feature, for the
//! integration tests under `tests/`. The in-memory repositories implement
//! the same port contracts as the Diesel adapters (duplicate-email
//! conflicts, `NotFound` on missing updates, forced `"new"` status) so the
//! full HTTP surface can be exercised without a database.

use std::sync::{Arc, Mutex};

use actix_web::{App, web};
use async_trait::async_trait;

use crate::domain::ports::{
    PasswordHasher, SessionIssuer, TicketRepository, TicketRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    DEFAULT_TICKET_STATUS, EmailAddress, NewTicket, NewUser, Ticket, TicketId, User, UserId,
    UserUpdate,
};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::state::HttpState;
use crate::outbound::security::{Argon2PasswordHasher, JwtSessionIssuer};

/// Signing key used by test states; long enough for HS256.
pub const TEST_SIGNING_KEY: &[u8] = b"helpdesk-test-signing-key-32-bytes-min";

/// In-memory `UserRepository` honouring the email-uniqueness contract.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: Mutex<i32>,
}

impl InMemoryUserRepository {
    /// Start with the given records already stored.
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id().as_i32()).max().unwrap_or(0) + 1;
        Self {
            users: Mutex::new(users),
            next_id: Mutex::new(next_id),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserRepositoryError> {
        let mut users = self.users.lock().expect("users lock");
        if users.iter().any(|u| u.email() == &new_user.email) {
            return Err(UserRepositoryError::duplicate_email(new_user.email.as_ref()));
        }

        let mut next_id = self.next_id.lock().expect("id lock");
        if *next_id == 0 {
            *next_id = 1;
        }
        let id = UserId::new(*next_id);
        *next_id += 1;

        let user = User::new(id, new_user.name, new_user.email, new_user.secret, false);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|u| u.email() == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|u| u.id() == id).cloned())
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, UserRepositoryError> {
        let mut users = self.users.lock().expect("users lock");

        if let Some(email) = update.email.as_ref() {
            if users.iter().any(|u| u.id() != id && u.email() == email) {
                return Err(UserRepositoryError::duplicate_email(email.as_ref()));
            }
        }

        let Some(user) = users.iter_mut().find(|u| u.id() == id) else {
            return Err(UserRepositoryError::not_found(id));
        };

        let updated = User::new(
            user.id(),
            user.name().clone(),
            update.email.unwrap_or_else(|| user.email().clone()),
            update.secret.unwrap_or_else(|| user.secret().clone()),
            update.admin_status.unwrap_or(user.admin_status()),
        );
        *user = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut users = self.users.lock().expect("users lock");
        let before = users.len();
        users.retain(|u| u.id() != id);
        if users.len() == before {
            return Err(UserRepositoryError::not_found(id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.users.lock().expect("users lock").clone())
    }
}

/// In-memory `TicketRepository` honouring the forced-status and `NotFound`
/// contracts.
#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: Mutex<Vec<Ticket>>,
    next_id: Mutex<i32>,
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn create(&self, new_ticket: NewTicket) -> Result<Ticket, TicketRepositoryError> {
        let mut next_id = self.next_id.lock().expect("id lock");
        if *next_id == 0 {
            *next_id = 1;
        }
        let id = TicketId::new(*next_id);
        *next_id += 1;

        let ticket = Ticket {
            id,
            user_id: new_ticket.user_id,
            title: new_ticket.title,
            description: new_ticket.description,
            status: DEFAULT_TICKET_STATUS.to_owned(),
        };
        self.tickets
            .lock()
            .expect("tickets lock")
            .push(ticket.clone());
        Ok(ticket)
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let tickets = self.tickets.lock().expect("tickets lock");
        Ok(tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(self.tickets.lock().expect("tickets lock").clone())
    }

    async fn update_status(
        &self,
        id: TicketId,
        status: &str,
    ) -> Result<Ticket, TicketRepositoryError> {
        let mut tickets = self.tickets.lock().expect("tickets lock");
        let Some(ticket) = tickets.iter_mut().find(|t| t.id == id) else {
            return Err(TicketRepositoryError::not_found(id));
        };
        ticket.status = status.to_owned();
        Ok(ticket.clone())
    }

    async fn delete(&self, id: TicketId) -> Result<(), TicketRepositoryError> {
        let mut tickets = self.tickets.lock().expect("tickets lock");
        let before = tickets.len();
        tickets.retain(|t| t.id != id);
        if tickets.len() == before {
            return Err(TicketRepositoryError::not_found(id));
        }
        Ok(())
    }
}

/// Build an [`HttpState`] over in-memory repositories with the real Argon2
/// hasher and JWT issuer.
pub fn test_state() -> HttpState {
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::default());
    let tickets: Arc<dyn TicketRepository> = Arc::new(InMemoryTicketRepository::default());
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let sessions: Arc<dyn SessionIssuer> =
        Arc::new(JwtSessionIssuer::with_default_validity(TEST_SIGNING_KEY));
    HttpState::new(users, tickets, hasher, sessions)
}

/// Build the full application over the given state, exactly as `main` wires
/// it.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(HealthState::new()))
        .configure(crate::inbound::http::configure)
}
