//! Shared application state for all routes. Immutable after startup.

use crate::config::Registry;
use crate::gateway::QueryGateway;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: QueryGateway,
    pub registry: Arc<Registry>,
    /// Signs the session and flash cookies.
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(pool: PgPool, registry: Registry, session_secret: &str) -> Self {
        AppState {
            gateway: QueryGateway::new(pool),
            registry: Arc::new(registry),
            cookie_key: cookie_key(session_secret),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.gateway.pool()
    }

    /// Registered table names, in navigation order.
    pub fn table_names(&self) -> Vec<&'static str> {
        self.registry.tables().iter().map(|t| t.name).collect()
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// 64-byte signing key derived from the configured secret.
pub fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_derivation_is_deterministic() {
        assert_eq!(cookie_key("s").signing(), cookie_key("s").signing());
        assert_ne!(cookie_key("s").signing(), cookie_key("t").signing());
        assert_eq!(cookie_key("").master().len(), 64);
    }
}
