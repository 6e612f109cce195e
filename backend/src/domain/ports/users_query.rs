//! Driving port for the public user directory.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, UserId, UserProfile};

/// Domain use-case port for listing users with follow counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Profiles ordered by join time.
    async fn list_users(&self, page: PageRequest) -> Result<Page<UserProfile>, Error>;

    /// One profile by id.
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, Error>;
}
