//! Port for post persistence and annotated post reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Post, PostId, PostView, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Port for writing posts and reading them with counts attached.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post.
    async fn create(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Fetch the stored post used for ownership checks.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Persist the mutable fields of an existing post.
    async fn update(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Delete a post together with its comments and likes.
    async fn delete(&self, id: &PostId) -> Result<(), PostRepositoryError>;

    /// Fetch one annotated post.
    async fn find_view(&self, id: &PostId) -> Result<Option<PostView>, PostRepositoryError>;

    /// List every post, newest first.
    async fn list_views(&self, page: PageRequest) -> Result<Page<PostView>, PostRepositoryError>;

    /// List posts by `viewer` and by the users `viewer` follows, newest first.
    async fn feed_views(
        &self,
        viewer: &UserId,
        page: PageRequest,
    ) -> Result<Page<PostView>, PostRepositoryError>;
}
