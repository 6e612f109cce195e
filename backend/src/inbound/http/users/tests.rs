//! Tests for the user directory and follow handlers.

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::{fixture, rstest};
use serde_json::Value;
use uuid::Uuid;

use crate::inbound::http::test_utils::{TestContext, TestUser};

#[fixture]
fn ctx() -> TestContext {
    TestContext::new()
}

async fn follow(ctx: &TestContext, follower: &TestUser, target: &TestUser) -> (StatusCode, Value) {
    ctx.send(
        TestRequest::post()
            .uri(&format!("/api/users/{}/follow", target.id))
            .insert_header(follower.bearer()),
    )
    .await
}

#[rstest]
#[actix_web::test]
async fn list_reports_follow_counts(ctx: TestContext) {
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let carol = ctx.user("carol").await;
    follow(&ctx, &alice, &bob).await;
    follow(&ctx, &carol, &bob).await;

    let (status, page) = ctx.send(TestRequest::get().uri("/api/users")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 3);
    let results = page["results"].as_array().expect("results");
    let bob_entry = results
        .iter()
        .find(|entry| entry["username"] == "bob")
        .expect("bob listed");
    assert_eq!(bob_entry["followers_count"], 2);
    assert_eq!(bob_entry["following_count"], 0);
    let alice_entry = results
        .iter()
        .find(|entry| entry["username"] == "alice")
        .expect("alice listed");
    assert_eq!(alice_entry["following_count"], 1);
}

#[rstest]
#[actix_web::test]
async fn list_pages_in_join_order(ctx: TestContext) {
    for name in ["alice", "bob", "carol"] {
        ctx.user(name).await;
    }

    let (status, page) = ctx
        .send(TestRequest::get().uri("/api/users?limit=1&offset=1"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["results"][0]["username"], "bob");
    assert!(page["next"].is_string());
    assert!(page["previous"].is_string());
}

#[rstest]
#[actix_web::test]
async fn get_user_by_id(ctx: TestContext) {
    let alice = ctx.user("alice").await;

    let (status, body) = ctx
        .send(TestRequest::get().uri(&format!("/api/users/{}", alice.id)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], alice.id.to_string());
    assert_eq!(body["username"], "alice");
}

#[rstest]
#[case(Uuid::new_v4().to_string(), StatusCode::NOT_FOUND)]
#[case("bogus".to_owned(), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn unknown_or_malformed_user(
    ctx: TestContext,
    #[case] id: String,
    #[case] expected: StatusCode,
) {
    let (status, _) = ctx
        .send(TestRequest::get().uri(&format!("/api/users/{id}")))
        .await;

    assert_eq!(status, expected);
}

#[rstest]
#[actix_web::test]
async fn following_twice_reports_existing_edge(ctx: TestContext) {
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;

    let (first, created) = follow(&ctx, &alice, &bob).await;
    let (second, existing) = follow(&ctx, &alice, &bob).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(created["id"], existing["id"]);
    assert_eq!(created["follower"]["username"], "alice");
    assert_eq!(created["following"]["followers_count"], 1);
    assert_eq!(ctx.store.follow_rows(), 1);
}

#[rstest]
#[actix_web::test]
async fn self_follow_is_rejected_without_a_row(ctx: TestContext) {
    let alice = ctx.user("alice").await;

    let (status, body) = follow(&ctx, &alice, &alice).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "self_follow");
    assert_eq!(ctx.store.follow_rows(), 0);
}

#[rstest]
#[actix_web::test]
async fn follow_of_missing_user_is_not_found(ctx: TestContext) {
    let alice = ctx.user("alice").await;

    let (status, _) = ctx
        .send(
            TestRequest::post()
                .uri(&format!("/api/users/{}/follow", Uuid::new_v4()))
                .insert_header(alice.bearer()),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn unfollow_is_idempotent(ctx: TestContext) {
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    follow(&ctx, &alice, &bob).await;
    let uri = format!("/api/users/{}/follow", bob.id);

    for _ in 0..2 {
        let (status, body) = ctx
            .send(TestRequest::delete().uri(&uri).insert_header(alice.bearer()))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());
    }
    assert_eq!(ctx.store.follow_rows(), 0);
}

#[rstest]
#[actix_web::test]
async fn follow_requires_authentication(ctx: TestContext) {
    let alice = ctx.user("alice").await;

    let (status, _) = ctx
        .send(TestRequest::post().uri(&format!("/api/users/{}/follow", alice.id)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
