//! Posts, their annotated read model and like outcomes.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Owned, UserId, UserProfile};

/// Maximum post body length in characters.
pub const POST_BODY_MAX: usize = 1000;

/// Validation errors for free-text bodies of posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyValidationError {
    /// Body was empty or whitespace only.
    #[error("body must not be blank")]
    Blank,
    /// Body exceeded the maximum length.
    #[error("body must be at most {max} characters")]
    TooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

pub(crate) fn validate_body(raw: String, max: usize) -> Result<String, BodyValidationError> {
    if raw.trim().is_empty() {
        return Err(BodyValidationError::Blank);
    }
    if raw.chars().count() > max {
        return Err(BodyValidationError::TooLong { max });
    }
    Ok(raw)
}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(Uuid);

impl PostId {
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

impl From<Uuid> for PostId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated post body.
///
/// ## Invariants
/// - Not blank and at most [`POST_BODY_MAX`] characters. Surrounding
///   whitespace is kept as written.
///
/// # Examples
/// ```
/// use social::domain::PostBody;
///
/// assert!(PostBody::new("hello").is_ok());
/// assert!(PostBody::new("   ").is_err());
/// assert!(PostBody::new("x".repeat(1001)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBody(String);

impl PostBody {
    /// Validate and construct a post body.
    pub fn new(raw: impl Into<String>) -> Result<Self, BodyValidationError> {
        validate_body(raw.into(), POST_BODY_MAX).map(Self)
    }
}

impl AsRef<str> for PostBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Stable identifier.
    pub id: PostId,
    /// Author and owner.
    pub author_id: UserId,
    /// Text content.
    pub body: PostBody,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Draft a new post authored by `author_id` at `now`.
    #[must_use]
    pub fn draft(author_id: UserId, body: PostBody, now: DateTime<Utc>) -> Self {
        Self {
            id: PostId::random(),
            author_id,
            body,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Owned for Post {
    fn owner_id(&self) -> &UserId {
        &self.author_id
    }
}

/// Post annotated with its author's profile and engagement counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    /// Stable identifier.
    pub id: PostId,
    /// Author's public profile.
    pub author: UserProfile,
    /// Text content.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Number of likes.
    pub likes_count: u64,
    /// Number of comments.
    pub comments_count: u64,
}

/// Partial update applied by `PATCH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    /// Replacement body, when supplied.
    pub body: Option<PostBody>,
}

/// Result of a like request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// A new like was recorded.
    Liked,
    /// The caller had already liked the post.
    AlreadyLiked,
}

impl LikeOutcome {
    /// Status text returned to clients.
    #[must_use]
    pub fn detail(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::AlreadyLiked => "already liked",
        }
    }
}
