//! Driving port for post reads and the personalised feed.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, PostId, PostView, UserId};

/// Domain use-case port for reading posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Every post, newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<PostView>, Error>;

    /// One post by id.
    async fn get(&self, post_id: &PostId) -> Result<PostView, Error>;

    /// Posts by `viewer` and by the users `viewer` follows, newest first.
    async fn feed(&self, viewer: &UserId, page: PageRequest) -> Result<Page<PostView>, Error>;
}
