//! Port for comment persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Comment, CommentId, CommentView, PostId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Port for writing comments and reading them with author profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a new comment.
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Fetch the stored comment used for ownership checks.
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Persist the mutable fields of an existing comment.
    async fn update(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Delete a comment.
    async fn delete(&self, id: &CommentId) -> Result<(), CommentRepositoryError>;

    /// Fetch one annotated comment.
    async fn find_view(&self, id: &CommentId)
    -> Result<Option<CommentView>, CommentRepositoryError>;

    /// List comments on `post_id`, oldest first.
    async fn list_views_for_post(
        &self,
        post_id: &PostId,
        page: PageRequest,
    ) -> Result<Page<CommentView>, CommentRepositoryError>;
}
