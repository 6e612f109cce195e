//! Tests for the post service.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FollowRepository, MockLikeRepository, MockPostRepository, PostRepositoryError, UserRepository,
};
use crate::domain::{ErrorCode, Follow, User, Username};
use crate::test_support::{InMemorySocialStore, SteppingClock};

type StoreService = PostService<InMemorySocialStore, InMemorySocialStore>;

struct Harness {
    store: Arc<InMemorySocialStore>,
    clock: Arc<SteppingClock>,
    service: StoreService,
}

impl Harness {
    async fn user(&self, name: &str) -> UserId {
        let user = User {
            id: UserId::random(),
            username: Username::new(name).expect("valid username"),
            date_joined: self.clock.utc(),
        };
        UserRepository::create(self.store.as_ref(), &user, "hash")
            .await
            .expect("user stored");
        user.id
    }

    async fn post(&self, author: &UserId, text: &str) -> PostView {
        self.service
            .create(author, PostBody::new(text).expect("valid body"))
            .await
            .expect("post created")
    }

    async fn follow(&self, follower: UserId, following: UserId) {
        let edge = Follow::draft(follower, following, self.clock.utc()).expect("distinct users");
        FollowRepository::insert_if_absent(self.store.as_ref(), &edge)
            .await
            .expect("follow stored");
    }
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemorySocialStore::new());
    let clock = Arc::new(SteppingClock::default());
    let service = PostService::new(Arc::clone(&store), Arc::clone(&store), clock.clone());
    Harness {
        store,
        clock,
        service,
    }
}

fn body(text: &str) -> PostBody {
    PostBody::new(text).expect("valid body")
}

#[tokio::test]
async fn update_missing_post_is_not_found_before_ownership() {
    let mut posts = MockPostRepository::new();
    posts.expect_find_by_id().return_once(|_| Ok(None));
    posts.expect_update().times(0);
    let service = PostService::new(
        Arc::new(posts),
        Arc::new(MockLikeRepository::new()),
        Arc::new(DefaultClock),
    );

    let err = service
        .update(
            &UserId::random(),
            &PostId::random(),
            PostChanges {
                body: Some(body("edit")),
            },
        )
        .await
        .expect_err("missing post");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn like_on_missing_post_never_touches_likes() {
    let mut posts = MockPostRepository::new();
    posts.expect_find_by_id().return_once(|_| Ok(None));
    let mut likes = MockLikeRepository::new();
    likes.expect_insert_if_absent().times(0);
    let service = PostService::new(Arc::new(posts), Arc::new(likes), Arc::new(DefaultClock));

    let err = service
        .like(&UserId::random(), &PostId::random())
        .await
        .expect_err("missing post");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn list_maps_connection_failure_to_service_unavailable() {
    let mut posts = MockPostRepository::new();
    posts
        .expect_list_views()
        .return_once(|_| Err(PostRepositoryError::connection("refused")));
    let service = PostService::new(
        Arc::new(posts),
        Arc::new(MockLikeRepository::new()),
        Arc::new(DefaultClock),
    );

    let err = service
        .list(PageRequest::default())
        .await
        .expect_err("store offline");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn create_returns_annotated_view(harness: Harness) {
    let alice = harness.user("alice").await;

    let view = harness.post(&alice, "hello").await;

    assert_eq!(view.author.id, alice);
    assert_eq!(view.author.username, "alice");
    assert_eq!(view.body, "hello");
    assert_eq!(view.likes_count, 0);
    assert_eq!(view.comments_count, 0);
    assert_eq!(view.created_at, view.updated_at);
}

#[rstest]
#[tokio::test]
async fn only_the_author_may_edit_or_delete(harness: Harness) {
    let alice = harness.user("alice").await;
    let bob = harness.user("bob").await;
    let post = harness.post(&alice, "mine").await;

    let edit = harness
        .service
        .update(
            &bob,
            &post.id,
            PostChanges {
                body: Some(body("hijack")),
            },
        )
        .await
        .expect_err("not the author");
    let delete = harness
        .service
        .delete(&bob, &post.id)
        .await
        .expect_err("not the author");

    assert_eq!(edit.code(), ErrorCode::Forbidden);
    assert_eq!(delete.code(), ErrorCode::Forbidden);
    let unchanged = harness.service.get(&post.id).await.expect("post kept");
    assert_eq!(unchanged.body, "mine");
}

#[rstest]
#[tokio::test]
async fn ensure_author_reports_missing_then_foreign(harness: Harness) {
    let alice = harness.user("alice").await;
    let bob = harness.user("bob").await;
    let post = harness.post(&alice, "mine").await;

    let missing = harness
        .service
        .ensure_author(&bob, &PostId::random())
        .await
        .expect_err("no such post");
    let foreign = harness
        .service
        .ensure_author(&bob, &post.id)
        .await
        .expect_err("not the author");

    assert_eq!(missing.code(), ErrorCode::NotFound);
    assert_eq!(foreign.code(), ErrorCode::Forbidden);
    assert!(harness.service.ensure_author(&alice, &post.id).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn author_update_refreshes_updated_at(harness: Harness) {
    let alice = harness.user("alice").await;
    let post = harness.post(&alice, "draft").await;

    let updated = harness
        .service
        .update(
            &alice,
            &post.id,
            PostChanges {
                body: Some(body("final")),
            },
        )
        .await
        .expect("author may edit");

    assert_eq!(updated.body, "final");
    assert_eq!(updated.created_at, post.created_at);
    assert!(updated.updated_at > post.updated_at);
}

#[rstest]
#[tokio::test]
async fn empty_update_leaves_post_untouched(harness: Harness) {
    let alice = harness.user("alice").await;
    let post = harness.post(&alice, "draft").await;

    let updated = harness
        .service
        .update(&alice, &post.id, PostChanges::default())
        .await
        .expect("no-op update");

    assert_eq!(updated, post);
}

#[rstest]
#[tokio::test]
async fn liking_twice_stores_one_like(harness: Harness) {
    let alice = harness.user("alice").await;
    let bob = harness.user("bob").await;
    let post = harness.post(&alice, "like me").await;

    let first = harness.service.like(&bob, &post.id).await.expect("like");
    let second = harness.service.like(&bob, &post.id).await.expect("like");

    assert_eq!(first, LikeOutcome::Liked);
    assert_eq!(second, LikeOutcome::AlreadyLiked);
    assert_eq!(harness.store.like_rows(), 1);
    let view = harness.service.get(&post.id).await.expect("post");
    assert_eq!(view.likes_count, 1);
}

#[rstest]
#[tokio::test]
async fn unliking_without_a_like_succeeds(harness: Harness) {
    let alice = harness.user("alice").await;
    let post = harness.post(&alice, "never liked").await;

    harness
        .service
        .unlike(&alice, &post.id)
        .await
        .expect("unlike is idempotent");

    assert_eq!(harness.store.like_rows(), 0);
}

#[rstest]
#[tokio::test]
async fn unlike_removes_existing_like(harness: Harness) {
    let alice = harness.user("alice").await;
    let post = harness.post(&alice, "liked").await;
    harness.service.like(&alice, &post.id).await.expect("like");

    harness.service.unlike(&alice, &post.id).await.expect("unlike");

    let view = harness.service.get(&post.id).await.expect("post");
    assert_eq!(view.likes_count, 0);
}

#[rstest]
#[tokio::test]
async fn deleting_a_post_removes_its_likes(harness: Harness) {
    let alice = harness.user("alice").await;
    let post = harness.post(&alice, "short lived").await;
    harness.service.like(&alice, &post.id).await.expect("like");

    harness.service.delete(&alice, &post.id).await.expect("delete");

    assert_eq!(harness.store.like_rows(), 0);
    let err = harness.service.get(&post.id).await.expect_err("gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_orders_newest_first(harness: Harness) {
    let alice = harness.user("alice").await;
    let first = harness.post(&alice, "first").await;
    let second = harness.post(&alice, "second").await;

    let page = harness
        .service
        .list(PageRequest::default())
        .await
        .expect("list");

    let ids: Vec<PostId> = page.items.iter().map(|view| view.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(page.total, 2);
}

#[rstest]
#[tokio::test]
async fn feed_holds_own_and_followed_posts_only(harness: Harness) {
    let alice = harness.user("alice").await;
    let bob = harness.user("bob").await;
    let carol = harness.user("carol").await;
    let own = harness.post(&alice, "mine").await;
    harness.post(&carol, "stranger").await;
    harness.follow(alice, bob).await;
    let followed = harness.post(&bob, "friend").await;

    let page = harness
        .service
        .feed(&alice, PageRequest::default())
        .await
        .expect("feed");

    let ids: Vec<PostId> = page.items.iter().map(|view| view.id).collect();
    assert_eq!(ids, vec![followed.id, own.id]);
    assert_eq!(page.total, 2);
}

#[rstest]
#[tokio::test]
async fn feed_for_lonely_user_with_no_posts_is_empty(harness: Harness) {
    let alice = harness.user("alice").await;
    let bob = harness.user("bob").await;
    harness.post(&bob, "elsewhere").await;

    let page = harness
        .service
        .feed(&alice, PageRequest::default())
        .await
        .expect("feed");

    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

#[rstest]
#[tokio::test]
async fn feed_pages_respect_limit_and_offset(harness: Harness) {
    let alice = harness.user("alice").await;
    for index in 0..5 {
        harness.post(&alice, &format!("post {index}")).await;
    }

    let page = harness
        .service
        .feed(&alice, PageRequest::new(2, 2).expect("valid page"))
        .await
        .expect("feed");

    let bodies: Vec<&str> = page.items.iter().map(|view| view.body.as_str()).collect();
    assert_eq!(bodies, vec!["post 2", "post 1"]);
    assert_eq!(page.total, 5);
}
