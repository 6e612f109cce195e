//! Port for the directed follow relation.

use async_trait::async_trait;

use crate::domain::{Follow, FollowOutcome, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
        /// One of the users vanished before the edge was stored.
        MissingReference { message: String } => "follow references a missing user: {message}",
    }
}

/// Port for idempotent follow and unfollow writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Store `follow` unless the same edge exists, returning the stored row.
    async fn insert_if_absent(
        &self,
        follow: &Follow,
    ) -> Result<FollowOutcome<Follow>, FollowRepositoryError>;

    /// Remove the edge if present. Returns `true` when a row was deleted.
    async fn remove(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, FollowRepositoryError>;
}
