//! Response bodies shared across the HTTP handlers.
//!
//! Domain read models stay free of serde; these DTOs fix the wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AccessToken, CommentView, FollowView, PostView, User, UserProfile};

/// Public profile of a user with follow counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    /// Number of users following this user.
    pub followers_count: u64,
    /// Number of users this user follows.
    pub following_count: u64,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.into(),
            username: profile.username,
            followers_count: profile.followers_count,
            following_count: profile.following_count,
        }
    }
}

/// Account created by `POST /api/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegisteredUserResponse {
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            username: user.username.to_string(),
        }
    }
}

/// Bearer credential issued by `POST /api/auth/token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed token to send as `Authorization: Bearer <access>`.
    pub access: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires.
    #[schema(example = 3600)]
    pub expires_in: u64,
}

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access: token.token,
            token_type: "Bearer".to_owned(),
            expires_in: token.expires_in,
        }
    }
}

/// Post with its author's profile and aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub author: UserResponse,
    #[schema(example = "Hello from the feed")]
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes_count: u64,
    pub comments_count: u64,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        Self {
            id: *view.id.as_uuid(),
            author: view.author.into(),
            body: view.body,
            created_at: view.created_at,
            updated_at: view.updated_at,
            likes_count: view.likes_count,
            comments_count: view.comments_count,
        }
    }
}

/// Comment on a post with its author's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    /// Identifier of the post the comment belongs to.
    pub post: Uuid,
    pub author: UserResponse,
    #[schema(example = "Nice post!")]
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: *view.id.as_uuid(),
            post: *view.post_id.as_uuid(),
            author: view.author.into(),
            body: view.body,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

/// Follow relation with both participants' profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FollowResponse {
    pub id: Uuid,
    pub follower: UserResponse,
    pub following: UserResponse,
    pub created_at: DateTime<Utc>,
}

impl From<FollowView> for FollowResponse {
    fn from(view: FollowView) -> Self {
        Self {
            id: view.id,
            follower: view.follower.into(),
            following: view.following.into(),
            created_at: view.created_at,
        }
    }
}

/// Plain acknowledgement such as `{"detail": "liked"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DetailResponse {
    #[schema(example = "liked")]
    pub detail: String,
}

impl DetailResponse {
    pub(crate) fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
