//! Process configuration.
//!
//! Everything is read from the environment once in `main` and passed down
//! explicitly; no process-wide mutable state. The token signing key comes
//! from a file so it never appears in the environment of a running process,
//! with an ephemeral fallback restricted to development.

use std::env;

use rand::RngCore;
use tracing::warn;

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `DATABASE_URL` is not set.
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The signing key file could not be read and no dev fallback applies.
    #[error("failed to read session key at {path}: {message}")]
    SessionKey { path: String, message: String },
    /// `TOKEN_TTL_HOURS` is not a positive integer.
    #[error("TOKEN_TTL_HOURS must be a positive integer, got {value:?}")]
    InvalidTokenTtl { value: String },
}

/// Application configuration assembled from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Listen address (`BIND_ADDR`, default `0.0.0.0:8080`).
    pub bind_addr: String,
    /// Symmetric token signing key (`SESSION_KEY_FILE`).
    pub session_key: Vec<u8>,
    /// Token validity window in hours (`TOKEN_TTL_HOURS`, default 24).
    pub token_ttl_hours: i64,
}

impl AppConfig {
    /// Read the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
        let session_key = load_session_key()?;
        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::InvalidTokenTtl { value: raw })?,
            Err(_) => crate::outbound::security::DEFAULT_VALIDITY_HOURS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            session_key,
            token_ttl_hours,
        })
    }
}

fn load_session_key() -> Result<Vec<u8>, ConfigError> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".to_owned());

    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %err, "using temporary session key (dev only)");
                let mut key = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut key);
                Ok(key)
            } else {
                Err(ConfigError::SessionKey {
                    path: key_path,
                    message: err.to_string(),
                })
            }
        }
    }
}
