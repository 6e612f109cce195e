//! HTTP tests for registration, token issuance and `/auth/me`.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::dto::{RegisteredUserResponse, TokenResponse, UserResponse};
use crate::inbound::http::test_utils::{PASSWORD, TestContext};

async fn post_json(ctx: &TestContext, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(ctx.app()).await;
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

#[rstest]
#[actix_web::test]
async fn register_returns_id_and_username_only() {
    let ctx = TestContext::new();

    let (status, body) = post_json(
        &ctx,
        "/api/auth/register",
        json!({"username": "alice", "password": PASSWORD}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let created: RegisteredUserResponse =
        serde_json::from_value(body.clone()).expect("registered user body");
    assert_eq!(created.username, "alice");
    assert!(body.get("password").is_none());
}

#[rstest]
#[actix_web::test]
async fn usernames_differing_only_in_case_are_rejected() {
    let ctx = TestContext::new();
    ctx.user("Alice").await;

    let (status, body) = post_json(
        &ctx,
        "/api/auth/register",
        json!({"username": "alice", "password": PASSWORD}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "username");
    assert_eq!(body["details"]["code"], "duplicate_username");
}

#[rstest]
#[case(json!({"username": "bob", "password": "short"}), "password", "password_too_short")]
#[case(json!({"username": "bob smith", "password": PASSWORD}), "username", "invalid_username")]
#[case(json!({"password": PASSWORD}), "username", "missing_field")]
#[case(json!({"username": "bob"}), "password", "missing_field")]
#[actix_web::test]
async fn invalid_registrations_name_the_field(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let ctx = TestContext::new();

    let (status, body) = post_json(&ctx, "/api/auth/register", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"username\": ")
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn token_is_issued_for_valid_credentials() {
    let ctx = TestContext::new();
    ctx.user("alice").await;

    let (status, body) = post_json(
        &ctx,
        "/api/auth/token",
        json!({"username": "ALICE", "password": PASSWORD}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token: TokenResponse = serde_json::from_value(body).expect("token body");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 300);
    assert!(!token.access.is_empty());
}

#[rstest]
#[case("alice", "wrong-password")]
#[case("nobody", PASSWORD)]
#[actix_web::test]
async fn bad_credentials_are_indistinguishable(#[case] username: &str, #[case] password: &str) {
    let ctx = TestContext::new();
    ctx.user("alice").await;

    let (status, body) = post_json(
        &ctx,
        "/api/auth/token",
        json!({"username": username, "password": password}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["detail"],
        "No active account found with the given credentials."
    );
}

#[rstest]
#[actix_web::test]
async fn me_returns_the_callers_profile() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let app = actix_test::init_service(ctx.app()).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(alice.bearer())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let profile: UserResponse = actix_test::read_body_json(response).await;
    assert_eq!(profile.id, *alice.id.as_uuid());
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.followers_count, 0);
}

#[rstest]
#[actix_web::test]
async fn me_requires_a_token() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/auth/me").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
