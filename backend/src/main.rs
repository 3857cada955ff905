//! Backend entry-point: wires configuration, migrations, the connection
//! pool, and the REST endpoints.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use chrono::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use helpdesk_backend::config::AppConfig;
use helpdesk_backend::domain::ports::{
    PasswordHasher, SessionIssuer, TicketRepository, UserRepository,
};
use helpdesk_backend::inbound::http;
use helpdesk_backend::inbound::http::health::HealthState;
use helpdesk_backend::inbound::http::state::HttpState;
use helpdesk_backend::outbound::persistence::{
    DbPool, DieselTicketRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use helpdesk_backend::outbound::security::{Argon2PasswordHasher, JwtSessionIssuer};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    run_pending_migrations(&config.database_url).map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(std::io::Error::other)?;

    let users: Arc<dyn UserRepository> = Arc::new(DieselUserRepository::new(pool.clone()));
    let tickets: Arc<dyn TicketRepository> = Arc::new(DieselTicketRepository::new(pool));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let sessions: Arc<dyn SessionIssuer> = Arc::new(JwtSessionIssuer::new(
        &config.session_key,
        Duration::hours(config.token_ttl_hours),
    ));
    let state = HttpState::new(users, tickets, hasher, sessions);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .configure(http::configure)
    })
    .bind(&config.bind_addr)?;

    info!(addr = %config.bind_addr, "listening");
    health_state.mark_ready();
    server.run().await
}
