//! Read-only user directory with follower counts.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{UserRepository, UsersQuery};
use crate::domain::repository_errors::{map_user_error, user_not_found};
use crate::domain::{Error, UserId, UserProfile};

/// Directory service implementing [`UsersQuery`].
#[derive(Clone)]
pub struct UserDirectoryService<U> {
    users: Arc<U>,
}

impl<U> UserDirectoryService<U> {
    /// Create the service from the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UsersQuery for UserDirectoryService<U>
where
    U: UserRepository,
{
    async fn list_users(&self, page: PageRequest) -> Result<Page<UserProfile>, Error> {
        self.users.list_profiles(page).await.map_err(map_user_error)
    }

    async fn get_user(&self, id: &UserId) -> Result<UserProfile, Error> {
        self.users
            .find_profile(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)
    }
}
