//! Driving port resolving a bearer token to the calling user.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Resolves presented credentials to an existing user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify `token` and confirm its subject still exists.
    async fn authenticate(&self, token: &str) -> Result<UserId, Error>;
}
