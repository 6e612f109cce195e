//! Driving port for exchanging credentials for an access token.
//!
//! Inbound adapters call it without knowing how passwords are stored or how
//! tokens are encoded.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials};

/// Domain use-case port for logging in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a token.
    ///
    /// Unknown usernames and wrong passwords fail identically with
    /// `401 Unauthorized`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;
}
