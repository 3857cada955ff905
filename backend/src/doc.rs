//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] aggregate covering every HTTP endpoint and the
//! schemas they exchange, plus the bearer-token security scheme used by the
//! protected routes.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Helpdesk backend API",
        description = "HTTP interface for user registration, login, and support ticket CRUD."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::promote_admin,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::get_ticket,
        crate::inbound::http::tickets::list_tickets,
        crate::inbound::http::tickets::update_ticket_status,
        crate::inbound::http::tickets::delete_ticket,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::UserProfile,
        crate::domain::Ticket,
        crate::inbound::http::users::LoginRequest,
        crate::inbound::http::users::LoginResponse,
        crate::inbound::http::users::RegisterRequest,
        crate::inbound::http::users::UpdateUserRequest,
        crate::inbound::http::users::PromoteAdminRequest,
        crate::inbound::http::users::MessageResponse,
        crate::inbound::http::tickets::NewTicketRequest,
        crate::inbound::http::tickets::UpdateTicketRequest,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_the_full_route_table() {
        let doc = ApiDoc::openapi();
        for path in [
            "/login",
            "/new_user",
            "/users",
            "/user/{id}",
            "/user_admin_status",
            "/new_ticket",
            "/tickets",
            "/ticket/{id}",
            "/edit_ticket/{id}",
            "/delete_ticket/{id}",
            "/health/live",
            "/health/ready",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path in OpenAPI document: {path}"
            );
        }
    }
}
