//! Driving port for following and unfollowing users.

use async_trait::async_trait;

use crate::domain::{Error, FollowOutcome, FollowView, UserId};

/// Domain use-case port for follow edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Follow `target`. Self-follows fail with `400`, unknown targets with
    /// `404`, and an existing edge is returned as [`FollowOutcome::Existing`].
    async fn follow(
        &self,
        caller: &UserId,
        target: &UserId,
    ) -> Result<FollowOutcome<FollowView>, Error>;

    /// Remove the edge to `target` if present.
    async fn unfollow(&self, caller: &UserId, target: &UserId) -> Result<(), Error>;
}
