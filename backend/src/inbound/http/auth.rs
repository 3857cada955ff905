//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that require a caller identity take [`Authenticated`] as an
//! extractor argument. Every failure mode (missing header, bad scheme,
//! expired, forged, malformed) collapses into one generic `401` so the
//! response never reveals why a token was rejected; the reason is logged at
//! debug level instead.

use std::future::{Ready, ready};

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use crate::domain::ports::SessionIssuer;
use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

const GENERIC_REJECTION: &str = "Authentication required";

/// Verified caller identity extracted from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated {
    user_id: UserId,
}

impl Authenticated {
    /// The user id asserted by the verified token.
    pub fn user_id(self) -> UserId {
        self.user_id
    }
}

fn rejection() -> Error {
    Error::unauthorized(GENERIC_REJECTION)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("session issuer is not configured"))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(rejection)?;
    let raw = header_value.to_str().map_err(|_| rejection())?;
    let token = raw.strip_prefix("Bearer ").ok_or_else(rejection)?;

    match state.sessions.verify(token.trim()) {
        Ok(user_id) => Ok(Authenticated { user_id }),
        Err(err) => {
            tracing::debug!(error = %err, "session token rejected");
            Err(rejection())
        }
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
