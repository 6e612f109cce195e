//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::TimeDelta;
use pagination::DEFAULT_LIMIT;
use social::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) jwt_secret: Option<Zeroizing<Vec<u8>>>,
    pub(crate) token_ttl: TimeDelta,
    pub(crate) default_page_size: u32,
}

impl ServerConfig {
    /// Construct a configuration serving `db_pool` on `bind_addr` with a
    /// one hour token lifetime and an ephemeral signing secret.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            jwt_secret: None,
            token_ttl: TimeDelta::hours(1),
            default_page_size: DEFAULT_LIMIT,
        }
    }

    /// Sign access tokens with `secret` instead of a per-process random key.
    #[must_use]
    pub fn with_jwt_secret(mut self, secret: &[u8]) -> Self {
        self.jwt_secret = Some(Zeroizing::new(secret.to_vec()));
        self
    }

    /// Set the access token lifetime.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: TimeDelta) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the page size used when list requests omit `limit`.
    #[must_use]
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }
}
