//! Comments attached to posts.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::post::validate_body;
use super::{BodyValidationError, Owned, PostId, UserId, UserProfile};

/// Maximum comment body length in characters.
pub const COMMENT_BODY_MAX: usize = 500;

/// Stable comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CommentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated comment body, at most [`COMMENT_BODY_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    /// Validate and construct a comment body.
    pub fn new(raw: impl Into<String>) -> Result<Self, BodyValidationError> {
        validate_body(raw.into(), COMMENT_BODY_MAX).map(Self)
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stored comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Stable identifier.
    pub id: CommentId,
    /// Parent post.
    pub post_id: PostId,
    /// Author and owner.
    pub author_id: UserId,
    /// Text content.
    pub body: CommentBody,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Draft a new comment on `post_id`.
    #[must_use]
    pub fn draft(post_id: PostId, author_id: UserId, body: CommentBody, now: DateTime<Utc>) -> Self {
        Self {
            id: CommentId::random(),
            post_id,
            author_id,
            body,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> &UserId {
        &self.author_id
    }
}

/// Comment annotated with its author's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    /// Stable identifier.
    pub id: CommentId,
    /// Parent post.
    pub post_id: PostId,
    /// Author's public profile.
    pub author: UserProfile,
    /// Text content.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied by `PATCH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentChanges {
    /// Replacement body, when supplied.
    pub body: Option<CommentBody>,
}
