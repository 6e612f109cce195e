//! User identity, usernames and the public profile projection.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;

/// Validation errors raised while parsing user identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username exceeded [`USERNAME_MAX`] characters.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The username contained characters outside letters, digits and `@.+-_`.
    #[error("username may only contain letters, digits and @/./+/-/_ characters")]
    UsernameInvalidCharacters,
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

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

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<UserId> for Uuid {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated username.
///
/// ## Invariants
/// - Trimmed, non-empty and at most [`USERNAME_MAX`] characters.
/// - Only letters, digits and `@ . + - _` are allowed.
///
/// Uniqueness is case-insensitive; [`Username::normalized`] yields the
/// comparison key.
///
/// # Examples
/// ```
/// use social::domain::Username;
///
/// let name = Username::new("  Alice ").expect("valid username");
/// assert_eq!(name.as_ref(), "Alice");
/// assert_eq!(name.normalized(), "alice");
/// assert!(Username::new("bad name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
        if !trimmed.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Lower-cased form used for uniqueness checks.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Display and login name.
    pub username: Username,
    /// Registration timestamp.
    pub date_joined: DateTime<Utc>,
}

/// Public profile annotated with follow counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Number of users following this user.
    pub followers_count: u64,
    /// Number of users this user follows.
    pub following_count: u64,
}
