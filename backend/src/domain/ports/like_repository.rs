//! Port for the like relation between users and posts.

use async_trait::async_trait;

use crate::domain::{PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by like repository adapters.
    pub enum LikeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "like repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "like repository query failed: {message}",
        /// The user or post vanished before the like was stored.
        MissingReference { message: String } => "like references a missing row: {message}",
    }
}

/// Port for idempotent like and unlike writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Store a like unless one exists. Returns `true` when a row was inserted.
    ///
    /// Concurrent duplicates resolve to `false` through the unique
    /// `(user_id, post_id)` constraint.
    async fn insert_if_absent(
        &self,
        user_id: &UserId,
        post_id: &PostId,
    ) -> Result<bool, LikeRepositoryError>;

    /// Remove a like if present. Returns `true` when a row was deleted.
    async fn remove(&self, user_id: &UserId, post_id: &PostId)
    -> Result<bool, LikeRepositoryError>;
}
