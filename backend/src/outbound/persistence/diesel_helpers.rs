//! Shared SQL fragments and row conversions for the annotated read models.
//!
//! Counts are computed with correlated subqueries so every view carries exact
//! totals without denormalised counters.

use pagination::PageRequest;

use crate::domain::{CommentId, CommentView, PostId, PostView, UserId, UserProfile};

use super::models::{CommentViewRow, PostViewRow, ProfileRow};

/// Public profile projection over `users u`.
pub(crate) const PROFILE_SELECT: &str = r#"
SELECT u.id, u.username,
    (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS followers_count,
    (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count
FROM users u
"#;

/// Post projection over `posts p JOIN users u`.
pub(crate) const POST_VIEW_SELECT: &str = r#"
SELECT p.id, p.body, p.created_at, p.updated_at,
    (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count,
    u.id AS author_id, u.username AS author_username,
    (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS author_followers_count,
    (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS author_following_count
FROM posts p
JOIN users u ON u.id = p.author_id
"#;

/// Comment projection over `comments c JOIN users u`.
pub(crate) const COMMENT_VIEW_SELECT: &str = r#"
SELECT c.id, c.post_id, c.body, c.created_at, c.updated_at,
    u.id AS author_id, u.username AS author_username,
    (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS author_followers_count,
    (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS author_following_count
FROM comments c
JOIN users u ON u.id = c.author_id
"#;

/// Feed filter: the viewer's own posts plus posts by anyone they follow.
pub(crate) const FEED_FILTER: &str = r#"
WHERE p.author_id = $1
   OR p.author_id IN (SELECT f.following_id FROM follows f WHERE f.follower_id = $1)
"#;

/// `LIMIT`/`OFFSET` bind values for a page request.
pub(crate) fn page_bounds(page: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (i64::from(page.limit()), offset)
}

/// Convert a database count into the domain's unsigned count.
pub(crate) fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

pub(crate) fn profile_from_row(row: ProfileRow) -> UserProfile {
    UserProfile {
        id: UserId::from(row.id),
        username: row.username,
        followers_count: count(row.followers_count),
        following_count: count(row.following_count),
    }
}

pub(crate) fn post_view_from_row(row: PostViewRow) -> PostView {
    PostView {
        id: PostId::from(row.id),
        author: UserProfile {
            id: UserId::from(row.author_id),
            username: row.author_username,
            followers_count: count(row.author_followers_count),
            following_count: count(row.author_following_count),
        },
        body: row.body,
        created_at: row.created_at,
        updated_at: row.updated_at,
        likes_count: count(row.likes_count),
        comments_count: count(row.comments_count),
    }
}

pub(crate) fn comment_view_from_row(row: CommentViewRow) -> CommentView {
    CommentView {
        id: CommentId::from(row.id),
        post_id: PostId::from(row.post_id),
        author: UserProfile {
            id: UserId::from(row.author_id),
            username: row.author_username,
            followers_count: count(row.author_followers_count),
            following_count: count(row.author_following_count),
        },
        body: row.body,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-1, 0)]
    #[case(0, 0)]
    #[case(42, 42)]
    fn negative_counts_clamp_to_zero(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(count(raw), expected);
    }

    #[rstest]
    fn page_bounds_follow_request() {
        let page = PageRequest::new(25, 50).expect("valid page");
        assert_eq!(page_bounds(page), (25, 50));
    }

    #[rstest]
    fn huge_offsets_saturate() {
        let page = PageRequest::new(10, u64::MAX).expect("valid page");
        assert_eq!(page_bounds(page).1, i64::MAX);
    }
}
