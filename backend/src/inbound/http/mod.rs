//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Route paths (including the aliases existing callers rely on) are wired in
//! [`configure`]; handlers live in [`users`], [`tickets`], and [`health`].

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod state;
pub mod tickets;
pub mod users;

pub use error::ApiResult;

/// Register every route on the application.
///
/// `/new_user` / `POST /user`, `GET /users` / `GET /user`, and
/// `/delete_user/{id}` / `DELETE /user/{id}` are aliases kept for caller
/// compatibility; each pair shares one handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(users::login))
        .route("/new_user", web::post().to(users::register))
        .route("/users", web::get().to(users::list_users))
        .service(
            web::resource("/user")
                .route(web::post().to(users::register))
                .route(web::get().to(users::list_users)),
        )
        .service(
            web::resource("/user/{id}")
                .route(web::put().to(users::update_user))
                .route(web::delete().to(users::delete_user)),
        )
        .route("/user_admin_status", web::put().to(users::promote_admin))
        .route("/delete_user/{id}", web::delete().to(users::delete_user))
        .route("/new_ticket", web::post().to(tickets::create_ticket))
        .route("/tickets", web::get().to(tickets::list_tickets))
        .route("/ticket/{id}", web::get().to(tickets::get_ticket))
        .route(
            "/edit_ticket/{id}",
            web::put().to(tickets::update_ticket_status),
        )
        .route(
            "/delete_ticket/{id}",
            web::delete().to(tickets::delete_ticket),
        )
        .route("/health/live", web::get().to(health::live))
        .route("/health/ready", web::get().to(health::ready));
}
