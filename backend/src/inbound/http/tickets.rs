//! Ticket API handlers.
//!
//! ```text
//! POST   /new_ticket          {"user_id":1,"title":"X","description":"..."}
//! GET    /tickets
//! GET    /ticket/{id}
//! PUT    /edit_ticket/{id}    {"status":"closed"}
//! DELETE /delete_ticket/{id}
//! ```
//!
//! Every route requires a bearer token. Tickets are always created with
//! status `"new"`; a status supplied at creation is ignored.

use actix_web::web;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{Error, NewTicket, Ticket, TicketId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponse;

/// Ticket creation body for `POST /new_ticket`. Unknown fields (including a
/// caller-supplied `status`) are ignored.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct NewTicketRequest {
    pub user_id: i32,
    pub title: String,
    pub description: String,
}

/// Status replacement body for `PUT /edit_ticket/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateTicketRequest {
    pub status: String,
}

fn map_ticket_repository_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::NotFound { .. } => Error::not_found("Ticket not found"),
        TicketRepositoryError::Connection { message } => Error::service_unavailable(message),
        TicketRepositoryError::Query { message } => Error::internal(message),
    }
}

/// Create a ticket with status forced to `"new"`.
#[utoipa::path(
    post,
    path = "/new_ticket",
    request_body = NewTicketRequest,
    responses(
        (status = 200, description = "Created ticket", body = Ticket),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
pub async fn create_ticket(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<NewTicketRequest>,
) -> ApiResult<web::Json<Ticket>> {
    let payload = payload.into_inner();
    let ticket = state
        .tickets
        .create(NewTicket {
            user_id: UserId::new(payload.user_id),
            title: payload.title,
            description: payload.description,
        })
        .await
        .map_err(map_ticket_repository_error)?;

    Ok(web::Json(ticket))
}

/// Fetch a single ticket.
#[utoipa::path(
    get,
    path = "/ticket/{id}",
    params(("id" = i32, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket", body = Ticket),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Unknown ticket", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "getTicket"
)]
pub async fn get_ticket(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Ticket>> {
    let ticket = state
        .tickets
        .find_by_id(TicketId::new(path.into_inner()))
        .await
        .map_err(map_ticket_repository_error)?;

    ticket
        .map(web::Json)
        .ok_or_else(|| Error::not_found("Ticket not found"))
}

/// List all tickets.
#[utoipa::path(
    get,
    path = "/tickets",
    responses(
        (status = 200, description = "All tickets", body = [Ticket]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "listTickets"
)]
pub async fn list_tickets(
    _auth: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Ticket>>> {
    let tickets = state
        .tickets
        .list()
        .await
        .map_err(map_ticket_repository_error)?;
    Ok(web::Json(tickets))
}

/// Replace a ticket's status. A missing ticket is a `404`, not a silent
/// no-op.
#[utoipa::path(
    put,
    path = "/edit_ticket/{id}",
    request_body = UpdateTicketRequest,
    params(("id" = i32, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Updated ticket", body = Ticket),
        (status = 400, description = "Blank status", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Unknown ticket", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "updateTicketStatus"
)]
pub async fn update_ticket_status(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateTicketRequest>,
) -> ApiResult<web::Json<Ticket>> {
    let status = payload.into_inner().status;
    if status.trim().is_empty() {
        return Err(Error::invalid_request("Status must not be empty")
            .with_details(json!({ "field": "status" })));
    }

    let ticket = state
        .tickets
        .update_status(TicketId::new(path.into_inner()), &status)
        .await
        .map_err(map_ticket_repository_error)?;

    Ok(web::Json(ticket))
}

/// Remove a ticket.
#[utoipa::path(
    delete,
    path = "/delete_ticket/{id}",
    params(("id" = i32, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Unknown ticket", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "deleteTicket"
)]
pub async fn delete_ticket(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .tickets
        .delete(TicketId::new(path.into_inner()))
        .await
        .map_err(map_ticket_repository_error)?;

    Ok(web::Json(MessageResponse {
        message: "Ticket was successfully deleted".to_owned(),
    }))
}
