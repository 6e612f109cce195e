//! OpenAPI schema definitions for list envelopes.
//!
//! The `pagination` crate stays framework-agnostic by not deriving
//! `ToSchema`. These wrappers mirror `pagination::Paginated<T>` for each
//! concrete item type so the document describes the list responses.

use utoipa::ToSchema;

use super::dto::{CommentResponse, PostResponse, UserResponse};

/// Page of posts, newest first.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaginatedPosts {
    /// Number of posts across all pages.
    count: u64,
    /// Absolute link to the next page.
    #[schema(example = "http://localhost:8080/api/posts?limit=20&offset=20")]
    next: Option<String>,
    /// Absolute link to the previous page.
    previous: Option<String>,
    results: Vec<PostResponse>,
}

/// Page of comments, oldest first.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaginatedComments {
    /// Number of comments on the post.
    count: u64,
    /// Absolute link to the next page.
    next: Option<String>,
    /// Absolute link to the previous page.
    previous: Option<String>,
    results: Vec<CommentResponse>,
}

/// Page of user profiles in join order.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaginatedUsers {
    /// Number of registered users.
    count: u64,
    /// Absolute link to the next page.
    next: Option<String>,
    /// Absolute link to the previous page.
    previous: Option<String>,
    results: Vec<UserResponse>,
}
