//! Comment domain service scoped to a parent post.
//!
//! Every operation first resolves the post, then the comment, and treats a
//! comment that belongs to another post as missing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ports::{CommentCommand, CommentQuery, CommentRepository, PostRepository};
use crate::domain::repository_errors::{
    comment_not_found, map_comment_error, map_post_error, post_not_found,
};
use crate::domain::{
    Access, Comment, CommentBody, CommentChanges, CommentId, CommentView, Error, PostId, UserId,
    authorize,
};

/// Comment service backed by comment and post repositories.
#[derive(Clone)]
pub struct CommentService<C, P> {
    comments: Arc<C>,
    posts: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> CommentService<C, P> {
    /// Create the service from its driven ports.
    pub fn new(comments: Arc<C>, posts: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            comments,
            posts,
            clock,
        }
    }
}

impl<C, P> CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn ensure_post(&self, post_id: &PostId) -> Result<(), Error> {
        self.posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_error)?
            .map(|_| ())
            .ok_or_else(post_not_found)
    }

    async fn load(&self, post_id: &PostId, comment_id: &CommentId) -> Result<Comment, Error> {
        self.ensure_post(post_id).await?;
        self.comments
            .find_by_id(comment_id)
            .await
            .map_err(map_comment_error)?
            .filter(|comment| &comment.post_id == post_id)
            .ok_or_else(comment_not_found)
    }

    async fn view(&self, comment_id: &CommentId) -> Result<CommentView, Error> {
        self.comments
            .find_view(comment_id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(comment_not_found)
    }
}

#[async_trait]
impl<C, P> CommentCommand for CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn create(
        &self,
        author: &UserId,
        post_id: &PostId,
        body: CommentBody,
    ) -> Result<CommentView, Error> {
        self.ensure_post(post_id).await?;
        let comment = Comment::draft(*post_id, *author, body, self.clock.utc());
        self.comments
            .create(&comment)
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id, %post_id, author_id = %author, "comment created");
        self.view(&comment.id).await
    }

    async fn ensure_author(
        &self,
        caller: &UserId,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Result<(), Error> {
        let comment = self.load(post_id, comment_id).await?;
        authorize(&comment, caller, Access::Write)
    }

    async fn update(
        &self,
        caller: &UserId,
        post_id: &PostId,
        comment_id: &CommentId,
        changes: CommentChanges,
    ) -> Result<CommentView, Error> {
        let mut comment = self.load(post_id, comment_id).await?;
        authorize(&comment, caller, Access::Write)?;
        if let Some(body) = changes.body {
            comment.body = body;
            comment.updated_at = self.clock.utc();
            self.comments
                .update(&comment)
                .await
                .map_err(map_comment_error)?;
            info!(%comment_id, "comment updated");
        }
        self.view(comment_id).await
    }

    async fn delete(
        &self,
        caller: &UserId,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Result<(), Error> {
        let comment = self.load(post_id, comment_id).await?;
        authorize(&comment, caller, Access::Write)?;
        self.comments
            .delete(comment_id)
            .await
            .map_err(map_comment_error)?;
        info!(%comment_id, "comment deleted");
        Ok(())
    }
}

#[async_trait]
impl<C, P> CommentQuery for CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn list(&self, post_id: &PostId, page: PageRequest) -> Result<Page<CommentView>, Error> {
        self.ensure_post(post_id).await?;
        self.comments
            .list_views_for_post(post_id, page)
            .await
            .map_err(map_comment_error)
    }

    async fn get(&self, post_id: &PostId, comment_id: &CommentId) -> Result<CommentView, Error> {
        self.load(post_id, comment_id).await?;
        self.view(comment_id).await
    }
}

#[cfg(test)]
#[path = "comment_service_tests.rs"]
mod tests;
