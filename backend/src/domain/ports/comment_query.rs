//! Driving port for reading comments on a post.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{CommentId, CommentView, Error, PostId};

/// Domain use-case port for reading comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentQuery: Send + Sync {
    /// Comments on `post_id`, oldest first.
    async fn list(&self, post_id: &PostId, page: PageRequest) -> Result<Page<CommentView>, Error>;

    /// One comment, provided it belongs to `post_id`.
    async fn get(&self, post_id: &PostId, comment_id: &CommentId) -> Result<CommentView, Error>;
}
