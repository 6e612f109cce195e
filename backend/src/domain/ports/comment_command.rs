//! Driving port for comment mutations scoped to a parent post.

use async_trait::async_trait;

use crate::domain::{CommentBody, CommentChanges, CommentId, CommentView, Error, PostId, UserId};

/// Domain use-case port for writing comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Comment on `post_id` as `author`.
    async fn create(
        &self,
        author: &UserId,
        post_id: &PostId,
        body: CommentBody,
    ) -> Result<CommentView, Error>;

    /// Confirm the comment exists under `post_id` and `caller` wrote it.
    async fn ensure_author(
        &self,
        caller: &UserId,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Result<(), Error>;

    /// Apply a partial update to a comment on `post_id`.
    async fn update(
        &self,
        caller: &UserId,
        post_id: &PostId,
        comment_id: &CommentId,
        changes: CommentChanges,
    ) -> Result<CommentView, Error>;

    /// Delete a comment on `post_id`.
    async fn delete(
        &self,
        caller: &UserId,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Result<(), Error>;
}
