//! Post domain service implementing the post command and query ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ports::{LikeRepository, PostCommand, PostQuery, PostRepository};
use crate::domain::repository_errors::{map_like_error, map_post_error, post_not_found};
use crate::domain::{
    Access, Error, LikeOutcome, Post, PostBody, PostChanges, PostId, PostView, UserId, authorize,
};

/// Post service backed by post and like repositories.
#[derive(Clone)]
pub struct PostService<P, L> {
    posts: Arc<P>,
    likes: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<P, L> PostService<P, L> {
    /// Create the service from its driven ports.
    pub fn new(posts: Arc<P>, likes: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            likes,
            clock,
        }
    }
}

impl<P, L> PostService<P, L>
where
    P: PostRepository,
{
    async fn load(&self, post_id: &PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(post_not_found)
    }

    async fn view(&self, post_id: &PostId) -> Result<PostView, Error> {
        self.posts
            .find_view(post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(post_not_found)
    }
}

#[async_trait]
impl<P, L> PostCommand for PostService<P, L>
where
    P: PostRepository,
    L: LikeRepository,
{
    async fn create(&self, author: &UserId, body: PostBody) -> Result<PostView, Error> {
        let post = Post::draft(*author, body, self.clock.utc());
        self.posts.create(&post).await.map_err(map_post_error)?;
        info!(post_id = %post.id, author_id = %author, "post created");
        self.view(&post.id).await
    }

    async fn ensure_author(&self, caller: &UserId, post_id: &PostId) -> Result<(), Error> {
        let post = self.load(post_id).await?;
        authorize(&post, caller, Access::Write)
    }

    async fn update(
        &self,
        caller: &UserId,
        post_id: &PostId,
        changes: PostChanges,
    ) -> Result<PostView, Error> {
        let mut post = self.load(post_id).await?;
        authorize(&post, caller, Access::Write)?;
        if let Some(body) = changes.body {
            post.body = body;
            post.updated_at = self.clock.utc();
            self.posts.update(&post).await.map_err(map_post_error)?;
            info!(%post_id, "post updated");
        }
        self.view(post_id).await
    }

    async fn delete(&self, caller: &UserId, post_id: &PostId) -> Result<(), Error> {
        let post = self.load(post_id).await?;
        authorize(&post, caller, Access::Write)?;
        self.posts.delete(post_id).await.map_err(map_post_error)?;
        info!(%post_id, "post deleted");
        Ok(())
    }

    async fn like(&self, caller: &UserId, post_id: &PostId) -> Result<LikeOutcome, Error> {
        self.load(post_id).await?;
        let inserted = self
            .likes
            .insert_if_absent(caller, post_id)
            .await
            .map_err(map_like_error)?;
        Ok(if inserted {
            info!(%post_id, user_id = %caller, "post liked");
            LikeOutcome::Liked
        } else {
            LikeOutcome::AlreadyLiked
        })
    }

    async fn unlike(&self, caller: &UserId, post_id: &PostId) -> Result<(), Error> {
        self.load(post_id).await?;
        if self
            .likes
            .remove(caller, post_id)
            .await
            .map_err(map_like_error)?
        {
            info!(%post_id, user_id = %caller, "post unliked");
        }
        Ok(())
    }
}

#[async_trait]
impl<P, L> PostQuery for PostService<P, L>
where
    P: PostRepository,
    L: LikeRepository,
{
    async fn list(&self, page: PageRequest) -> Result<Page<PostView>, Error> {
        self.posts.list_views(page).await.map_err(map_post_error)
    }

    async fn get(&self, post_id: &PostId) -> Result<PostView, Error> {
        self.view(post_id).await
    }

    async fn feed(&self, viewer: &UserId, page: PageRequest) -> Result<Page<PostView>, Error> {
        self.posts
            .feed_views(viewer, page)
            .await
            .map_err(map_post_error)
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
