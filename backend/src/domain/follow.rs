//! Directed follow relationships between users.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{UserId, UserProfile};

/// Stored follow edge from `follower_id` to `following_id`.
///
/// ## Invariants
/// - `follower_id != following_id`; services reject self-follows and the
///   database enforces the same rule with a check constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    /// Stable identifier.
    pub id: Uuid,
    /// User who subscribes.
    pub follower_id: UserId,
    /// User being followed.
    pub following_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// Draft a new edge. Returns `None` for a self-follow.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use social::domain::{Follow, UserId};
    ///
    /// let me = UserId::random();
    /// assert!(Follow::draft(me, me, Utc::now()).is_none());
    /// assert!(Follow::draft(me, UserId::random(), Utc::now()).is_some());
    /// ```
    #[must_use]
    pub fn draft(follower_id: UserId, following_id: UserId, now: DateTime<Utc>) -> Option<Self> {
        (follower_id != following_id).then(|| Self {
            id: Uuid::new_v4(),
            follower_id,
            following_id,
            created_at: now,
        })
    }
}

/// Follow edge with both endpoints resolved to public profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowView {
    /// Stable identifier.
    pub id: Uuid,
    /// Subscriber profile.
    pub follower: UserProfile,
    /// Followed profile.
    pub following: UserProfile,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Whether an idempotent create inserted a row or found an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome<T> {
    /// A new edge was stored.
    Created(T),
    /// The edge already existed.
    Existing(T),
}

impl<T> FollowOutcome<T> {
    /// True when a new row was inserted.
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// Borrow the carried value.
    #[must_use]
    pub fn value(&self) -> &T {
        match self {
            Self::Created(value) | Self::Existing(value) => value,
        }
    }

    /// Transform the carried value, keeping the variant.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FollowOutcome<U> {
        match self {
            Self::Created(value) => FollowOutcome::Created(f(value)),
            Self::Existing(value) => FollowOutcome::Existing(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_preserves_variant() {
        let created = FollowOutcome::Created(1).map(|v| v + 1);
        let existing = FollowOutcome::Existing(1).map(|v| v + 1);
        assert!(created.is_created());
        assert!(!existing.is_created());
        assert_eq!(created.value(), &2);
        assert_eq!(existing.value(), &2);
    }
}
