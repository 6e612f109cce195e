//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{User, UserId, UserProfile, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username, ignoring case.
        DuplicateUsername { username: String } => "username {username} is already taken",
    }
}

/// Password hash stored for an account, looked up during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Owner of the hash.
    pub user_id: UserId,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

/// Port for reading and writing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account with its password hash.
    ///
    /// Adapters report a case-insensitive clash as
    /// [`UserPersistenceError::DuplicateUsername`].
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Whether any account uses `username`, ignoring case.
    async fn username_exists(&self, username: &Username) -> Result<bool, UserPersistenceError>;

    /// Fetch the stored hash for `username`, ignoring case.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch one annotated public profile.
    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, UserPersistenceError>;

    /// List annotated profiles ordered by join time.
    async fn list_profiles(
        &self,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, UserPersistenceError>;
}
