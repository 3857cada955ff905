//! Helpdesk backend library.
//!
//! A small multi-tenant helpdesk: user registration and login with hashed
//! passwords and signed session tokens, plus support ticket CRUD. Laid out
//! hexagonally: `domain` holds entities, ports, and the auth service;
//! `inbound::http` adapts Actix Web requests onto the domain; `outbound`
//! implements the ports against PostgreSQL, Argon2, and HS256 JWTs.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
