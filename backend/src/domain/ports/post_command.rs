//! Driving port for post mutations and likes.

use async_trait::async_trait;

use crate::domain::{Error, LikeOutcome, PostBody, PostChanges, PostId, PostView, UserId};

/// Domain use-case port for writing posts.
///
/// Update and delete are restricted to the author; the target is loaded
/// first so an unknown id yields `404` before ownership is checked.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post authored by `author`.
    async fn create(&self, author: &UserId, body: PostBody) -> Result<PostView, Error>;

    /// Confirm `post_id` exists and `caller` wrote it.
    async fn ensure_author(&self, caller: &UserId, post_id: &PostId) -> Result<(), Error>;

    /// Apply a partial update.
    async fn update(
        &self,
        caller: &UserId,
        post_id: &PostId,
        changes: PostChanges,
    ) -> Result<PostView, Error>;

    /// Delete a post and everything attached to it.
    async fn delete(&self, caller: &UserId, post_id: &PostId) -> Result<(), Error>;

    /// Like a post. Repeating the call is harmless.
    async fn like(&self, caller: &UserId, post_id: &PostId) -> Result<LikeOutcome, Error>;

    /// Withdraw a like. Succeeds whether or not a like existed.
    async fn unlike(&self, caller: &UserId, post_id: &PostId) -> Result<(), Error>;
}
