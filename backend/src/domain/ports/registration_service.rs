//! Driving port for account sign-up.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account. Usernames are unique ignoring case.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}
