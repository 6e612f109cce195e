//! Integration tests for the Diesel adapters behind the domain services.
//!
//! Each test registers its own uniquely named users so suites can share one
//! database. Set `SOCIAL_TEST_DATABASE_URL` to run them.

mod support;

use pagination::PageRequest;
use rstest::rstest;
use social::domain::ports::{
    CommentCommand, CommentQuery, FollowCommand, LoginService, PostCommand, PostQuery,
    ReadinessProbe, RegistrationService, UsersQuery,
};
use social::domain::{
    CommentBody, CommentId, ErrorCode, FollowOutcome, LikeOutcome, LoginCredentials, PostBody, PostChanges,
    PostId, Registration, UserId,
};
use support::{DieselServices, diesel_services, test_database_url, unique_username};

const PASSWORD: &str = "password123";

async fn register(services: &DieselServices, prefix: &str) -> (UserId, String) {
    let username = unique_username(prefix);
    let registration = Registration::try_from_parts(&username, PASSWORD).expect("valid input");
    let user = services
        .accounts
        .register(registration)
        .await
        .expect("registration succeeds");
    (user.id, username)
}

fn first_page() -> PageRequest {
    PageRequest::new(100, 0).expect("valid page")
}

async fn post(services: &DieselServices, author: &UserId, body: &str) -> PostId {
    services
        .posts
        .create(author, PostBody::new(body).expect("valid body"))
        .await
        .expect("post created")
        .id
}

async fn comment_ids(services: &DieselServices, post_id: &PostId) -> Vec<CommentId> {
    services
        .comments
        .list(post_id, first_page())
        .await
        .expect("comments")
        .items
        .iter()
        .map(|view| view.id)
        .collect()
}

#[rstest]
#[tokio::test]
async fn pool_answers_readiness_probe() {
    let Some(url) = test_database_url() else { return };
    let services = diesel_services(&url).await;

    assert!(services.pool.is_ready().await);
}

#[rstest]
#[tokio::test]
async fn usernames_are_unique_ignoring_case() {
    let Some(url) = test_database_url() else { return };
    let services = diesel_services(&url).await;
    let (_, username) = register(&services, "case").await;

    let err = services
        .accounts
        .register(
            Registration::try_from_parts(&username.to_uppercase(), PASSWORD).expect("valid input"),
        )
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let credentials =
        LoginCredentials::try_from_parts(&username.to_uppercase(), PASSWORD).expect("credentials");
    assert!(services.accounts.login(&credentials).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn likes_are_stored_once_and_counted() {
    let Some(url) = test_database_url() else { return };
    let services = diesel_services(&url).await;
    let (author, _) = register(&services, "author").await;
    let (fan, _) = register(&services, "fan").await;
    let post_id = post(&services, &author, "likeable").await;

    let first = services.posts.like(&fan, &post_id).await.expect("like");
    let second = services.posts.like(&fan, &post_id).await.expect("like again");
    let liked = services.posts.get(&post_id).await.expect("post");

    assert_eq!(first, LikeOutcome::Liked);
    assert_eq!(second, LikeOutcome::AlreadyLiked);
    assert_eq!(liked.likes_count, 1);

    services.posts.unlike(&fan, &post_id).await.expect("unlike");
    services.posts.unlike(&fan, &post_id).await.expect("unlike again");
    assert_eq!(services.posts.get(&post_id).await.expect("post").likes_count, 0);
}

#[rstest]
#[tokio::test]
async fn feed_follows_the_graph() {
    let Some(url) = test_database_url() else { return };
    let services = diesel_services(&url).await;
    let (reader, _) = register(&services, "reader").await;
    let (writer, _) = register(&services, "writer").await;
    post(&services, &reader, "own words").await;
    post(&services, &writer, "before follow").await;

    let before = services.posts.feed(&reader, first_page()).await.expect("feed");
    assert_eq!(before.total, 1);

    let outcome = services.follows.follow(&reader, &writer).await.expect("follow");
    assert!(matches!(outcome, FollowOutcome::Created(_)));
    let again = services.follows.follow(&reader, &writer).await.expect("follow again");
    assert!(matches!(again, FollowOutcome::Existing(_)));
    let latest = post(&services, &writer, "after follow").await;

    let after = services.posts.feed(&reader, first_page()).await.expect("feed");
    assert_eq!(after.total, 3);
    assert_eq!(after.items.first().map(|view| view.id), Some(latest));

    services.follows.unfollow(&reader, &writer).await.expect("unfollow");
    services.follows.unfollow(&reader, &writer).await.expect("unfollow again");
    let profile = services.users.get_user(&writer).await.expect("profile");
    assert_eq!(profile.followers_count, 0);
}

#[rstest]
#[tokio::test]
async fn self_follow_is_rejected() {
    let Some(url) = test_database_url() else { return };
    let services = diesel_services(&url).await;
    let (user, _) = register(&services, "narcissus").await;

    let err = services.follows.follow(&user, &user).await.expect_err("self follow");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(services.users.get_user(&user).await.expect("profile").following_count, 0);
}

#[rstest]
#[tokio::test]
async fn comments_count_and_cascade() {
    let Some(url) = test_database_url() else { return };
    let services = diesel_services(&url).await;
    let (author, _) = register(&services, "host").await;
    let (guest, _) = register(&services, "guest").await;
    let post_id = post(&services, &author, "discuss").await;

    let kept = services
        .comments
        .create(&guest, &post_id, CommentBody::new("first").expect("body"))
        .await
        .expect("comment");
    let removed = services
        .comments
        .create(&guest, &post_id, CommentBody::new("second").expect("body"))
        .await
        .expect("comment");
    let forbidden = services
        .comments
        .delete(&author, &post_id, &removed.id)
        .await
        .expect_err("not the author");
    services
        .comments
        .delete(&guest, &post_id, &removed.id)
        .await
        .expect("author deletes");

    assert_eq!(forbidden.code(), ErrorCode::Forbidden);
    let listed = comment_ids(&services, &post_id).await;
    assert_eq!(listed, vec![kept.id]);
    assert_eq!(services.posts.get(&post_id).await.expect("post").comments_count, 1);

    services.posts.delete(&author, &post_id).await.expect("delete post");
    let gone = services.comments.get(&post_id, &kept.id).await.expect_err("cascade");
    assert_eq!(gone.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn only_the_author_edits_posts() {
    let Some(url) = test_database_url() else { return };
    let services = diesel_services(&url).await;
    let (author, _) = register(&services, "owner").await;
    let (other, _) = register(&services, "other").await;
    let post_id = post(&services, &author, "original").await;
    let changes = || PostChanges {
        body: Some(PostBody::new("edited").expect("body")),
    };

    let err = services
        .posts
        .update(&other, &post_id, changes())
        .await
        .expect_err("forbidden");
    let updated = services
        .posts
        .update(&author, &post_id, changes())
        .await
        .expect("author edits");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(updated.body, "edited");
    assert!(updated.updated_at >= updated.created_at);
}

#[rstest]
#[tokio::test]
async fn follow_racing_unfollow_still_succeeds() {
    let Some(url) = test_database_url() else { return };
    let services = diesel_services(&url).await;
    let (fan, _) = register(&services, "racer").await;
    let (idol, _) = register(&services, "idol").await;
    services.follows.follow(&fan, &idol).await.expect("initial follow");

    for _ in 0..25 {
        let (followed, unfollowed) = tokio::join!(
            services.follows.follow(&fan, &idol),
            services.follows.unfollow(&fan, &idol),
        );
        followed.expect("follow resolves despite concurrent unfollow");
        unfollowed.expect("unfollow succeeds");
        services.follows.follow(&fan, &idol).await.expect("follow restored");
    }
}
