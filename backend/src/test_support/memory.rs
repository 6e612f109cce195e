//! In-memory implementation of every repository port.
//!
//! Mirrors the relational constraints of the real schema: case-insensitive
//! unique usernames, unique `(user, post)` likes, unique and non-reflexive
//! follows, and cascading deletes from posts to comments and likes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, FollowRepository, FollowRepositoryError,
    LikeRepository, LikeRepositoryError, PostRepository, PostRepositoryError, StoredCredentials,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentId, CommentView, Follow, FollowOutcome, Post, PostId, PostView, User, UserId,
    UserProfile, Username,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<StoredUser>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<(UserId, PostId)>,
    follows: Vec<Follow>,
    unavailable: bool,
}

impl StoreState {
    fn profile(&self, id: &UserId) -> Option<UserProfile> {
        let stored = self.users.iter().find(|stored| &stored.user.id == id)?;
        Some(UserProfile {
            id: *id,
            username: stored.user.username.to_string(),
            followers_count: count(self.follows.iter().filter(|f| &f.following_id == id)),
            following_count: count(self.follows.iter().filter(|f| &f.follower_id == id)),
        })
    }

    fn post_view(&self, post: &Post) -> Option<PostView> {
        Some(PostView {
            id: post.id,
            author: self.profile(&post.author_id)?,
            body: post.body.as_ref().to_owned(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            likes_count: count(self.likes.iter().filter(|(_, id)| id == &post.id)),
            comments_count: count(self.comments.iter().filter(|c| c.post_id == post.id)),
        })
    }

    fn comment_view(&self, comment: &Comment) -> Option<CommentView> {
        Some(CommentView {
            id: comment.id,
            post_id: comment.post_id,
            author: self.profile(&comment.author_id)?,
            body: comment.body.as_ref().to_owned(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
    }

    fn newest_first<'a>(&self, posts: impl Iterator<Item = &'a Post>) -> Vec<PostView> {
        let mut selected: Vec<&Post> = posts.collect();
        selected.reverse();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        selected
            .into_iter()
            .filter_map(|post| self.post_view(post))
            .collect()
    }

    fn user_exists(&self, id: &UserId) -> bool {
        self.users.iter().any(|stored| &stored.user.id == id)
    }
}

fn count<I: Iterator>(iter: I) -> u64 {
    u64::try_from(iter.count()).unwrap_or(u64::MAX)
}

fn paginate<T>(rows: Vec<T>, page: PageRequest) -> Page<T> {
    let total = count(rows.iter());
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    let items = rows.into_iter().skip(offset).take(limit).collect();
    Page::new(items, total, page)
}

/// Thread-safe in-memory store implementing all repository ports.
#[derive(Debug, Default)]
pub struct InMemorySocialStore {
    state: Mutex<StoreState>,
}

impl InMemorySocialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of stored likes, for asserting idempotency.
    pub fn like_rows(&self) -> usize {
        self.lock().likes.len()
    }

    /// Number of stored follows, for asserting idempotency.
    pub fn follow_rows(&self) -> usize {
        self.lock().follows.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn guard<E>(&self, offline: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, StoreState>, E> {
        let state = self.lock();
        if state.unavailable {
            return Err(offline("in-memory store offline"));
        }
        Ok(state)
    }
}

#[async_trait]
impl UserRepository for InMemorySocialStore {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut state = self.guard(UserPersistenceError::connection)?;
        let key = user.username.normalized();
        if state
            .users
            .iter()
            .any(|stored| stored.user.username.normalized() == key)
        {
            return Err(UserPersistenceError::duplicate_username(user.username.as_ref()));
        }
        state.users.push(StoredUser {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(())
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let state = self.guard(UserPersistenceError::connection)?;
        let key = username.normalized();
        Ok(state
            .users
            .iter()
            .any(|stored| stored.user.username.normalized() == key))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.guard(UserPersistenceError::connection)?;
        let key = username.to_lowercase();
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.username.normalized() == key)
            .map(|stored| StoredCredentials {
                user_id: stored.user.id,
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, UserPersistenceError> {
        let state = self.guard(UserPersistenceError::connection)?;
        Ok(state.profile(id))
    }

    async fn list_profiles(
        &self,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, UserPersistenceError> {
        let state = self.guard(UserPersistenceError::connection)?;
        let mut users: Vec<&StoredUser> = state.users.iter().collect();
        users.sort_by_key(|stored| stored.user.date_joined);
        let profiles = users
            .into_iter()
            .filter_map(|stored| state.profile(&stored.user.id))
            .collect();
        Ok(paginate(profiles, page))
    }
}

#[async_trait]
impl PostRepository for InMemorySocialStore {
    async fn create(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut state = self.guard(PostRepositoryError::connection)?;
        if !state.user_exists(&post.author_id) {
            return Err(PostRepositoryError::query("author does not exist"));
        }
        state.posts.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let state = self.guard(PostRepositoryError::connection)?;
        Ok(state.posts.iter().find(|post| &post.id == id).cloned())
    }

    async fn update(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut state = self.guard(PostRepositoryError::connection)?;
        if let Some(stored) = state.posts.iter_mut().find(|stored| stored.id == post.id) {
            stored.body = post.body.clone();
            stored.updated_at = post.updated_at;
        }
        Ok(())
    }

    async fn delete(&self, id: &PostId) -> Result<(), PostRepositoryError> {
        let mut state = self.guard(PostRepositoryError::connection)?;
        state.posts.retain(|post| &post.id != id);
        state.comments.retain(|comment| &comment.post_id != id);
        state.likes.retain(|(_, post_id)| post_id != id);
        Ok(())
    }

    async fn find_view(&self, id: &PostId) -> Result<Option<PostView>, PostRepositoryError> {
        let state = self.guard(PostRepositoryError::connection)?;
        Ok(state
            .posts
            .iter()
            .find(|post| &post.id == id)
            .and_then(|post| state.post_view(post)))
    }

    async fn list_views(&self, page: PageRequest) -> Result<Page<PostView>, PostRepositoryError> {
        let state = self.guard(PostRepositoryError::connection)?;
        let views = state.newest_first(state.posts.iter());
        Ok(paginate(views, page))
    }

    async fn feed_views(
        &self,
        viewer: &UserId,
        page: PageRequest,
    ) -> Result<Page<PostView>, PostRepositoryError> {
        let state = self.guard(PostRepositoryError::connection)?;
        let followed: Vec<UserId> = state
            .follows
            .iter()
            .filter(|follow| &follow.follower_id == viewer)
            .map(|follow| follow.following_id)
            .collect();
        let views = state.newest_first(
            state
                .posts
                .iter()
                .filter(|post| &post.author_id == viewer || followed.contains(&post.author_id)),
        );
        Ok(paginate(views, page))
    }
}

#[async_trait]
impl CommentRepository for InMemorySocialStore {
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut state = self.guard(CommentRepositoryError::connection)?;
        if !state.posts.iter().any(|post| post.id == comment.post_id) {
            return Err(CommentRepositoryError::query("post does not exist"));
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let state = self.guard(CommentRepositoryError::connection)?;
        Ok(state.comments.iter().find(|comment| &comment.id == id).cloned())
    }

    async fn update(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut state = self.guard(CommentRepositoryError::connection)?;
        if let Some(stored) = state
            .comments
            .iter_mut()
            .find(|stored| stored.id == comment.id)
        {
            stored.body = comment.body.clone();
            stored.updated_at = comment.updated_at;
        }
        Ok(())
    }

    async fn delete(&self, id: &CommentId) -> Result<(), CommentRepositoryError> {
        let mut state = self.guard(CommentRepositoryError::connection)?;
        state.comments.retain(|comment| &comment.id != id);
        Ok(())
    }

    async fn find_view(
        &self,
        id: &CommentId,
    ) -> Result<Option<CommentView>, CommentRepositoryError> {
        let state = self.guard(CommentRepositoryError::connection)?;
        Ok(state
            .comments
            .iter()
            .find(|comment| &comment.id == id)
            .and_then(|comment| state.comment_view(comment)))
    }

    async fn list_views_for_post(
        &self,
        post_id: &PostId,
        page: PageRequest,
    ) -> Result<Page<CommentView>, CommentRepositoryError> {
        let state = self.guard(CommentRepositoryError::connection)?;
        let mut comments: Vec<&Comment> = state
            .comments
            .iter()
            .filter(|comment| &comment.post_id == post_id)
            .collect();
        comments.sort_by_key(|comment| comment.created_at);
        let views = comments
            .into_iter()
            .filter_map(|comment| state.comment_view(comment))
            .collect();
        Ok(paginate(views, page))
    }
}

#[async_trait]
impl LikeRepository for InMemorySocialStore {
    async fn insert_if_absent(
        &self,
        user_id: &UserId,
        post_id: &PostId,
    ) -> Result<bool, LikeRepositoryError> {
        let mut state = self.guard(LikeRepositoryError::connection)?;
        if !state.user_exists(user_id) || !state.posts.iter().any(|post| &post.id == post_id) {
            return Err(LikeRepositoryError::missing_reference("user or post"));
        }
        if state
            .likes
            .iter()
            .any(|(user, post)| user == user_id && post == post_id)
        {
            return Ok(false);
        }
        state.likes.push((*user_id, *post_id));
        Ok(true)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        post_id: &PostId,
    ) -> Result<bool, LikeRepositoryError> {
        let mut state = self.guard(LikeRepositoryError::connection)?;
        let before = state.likes.len();
        state
            .likes
            .retain(|(user, post)| !(user == user_id && post == post_id));
        Ok(state.likes.len() != before)
    }
}

#[async_trait]
impl FollowRepository for InMemorySocialStore {
    async fn insert_if_absent(
        &self,
        follow: &Follow,
    ) -> Result<FollowOutcome<Follow>, FollowRepositoryError> {
        let mut state = self.guard(FollowRepositoryError::connection)?;
        if follow.follower_id == follow.following_id {
            return Err(FollowRepositoryError::query("follows_no_self_follow violated"));
        }
        if !state.user_exists(&follow.follower_id) || !state.user_exists(&follow.following_id) {
            return Err(FollowRepositoryError::missing_reference("follower or following"));
        }
        if let Some(existing) = state.follows.iter().find(|stored| {
            stored.follower_id == follow.follower_id && stored.following_id == follow.following_id
        }) {
            return Ok(FollowOutcome::Existing(existing.clone()));
        }
        state.follows.push(follow.clone());
        Ok(FollowOutcome::Created(follow.clone()))
    }

    async fn remove(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut state = self.guard(FollowRepositoryError::connection)?;
        let before = state.follows.len();
        state.follows.retain(|follow| {
            !(&follow.follower_id == follower_id && &follow.following_id == following_id)
        });
        Ok(state.follows.len() != before)
    }
}
