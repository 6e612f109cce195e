//! End-to-end HTTP flow over the in-memory store exposed by `test-support`.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::TimeDelta;
use mockable::DefaultClock;
use serde_json::{Value, json};
use social::Trace;
use social::domain::{
    AccountService, CommentService, FollowService, PostService, UserDirectoryService,
};
use social::inbound::http::configure_api;
use social::inbound::http::state::{HttpState, HttpStatePorts};
use social::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use social::test_support::{InMemorySocialStore, SteppingClock};

fn http_state() -> HttpState {
    let store = Arc::new(InMemorySocialStore::new());
    let clock = Arc::new(SteppingClock::default());
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&store),
        Arc::new(Argon2PasswordHasher::with_params(256, 1, 1).expect("argon2 params")),
        Arc::new(JwtTokenCodec::new(
            b"flow-secret",
            TimeDelta::minutes(5),
            Arc::new(DefaultClock),
        )),
        clock.clone(),
    ));
    let posts = Arc::new(PostService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        clock.clone(),
    ));
    let comments = Arc::new(CommentService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        clock.clone(),
    ));
    HttpState::new(HttpStatePorts {
        registration: accounts.clone(),
        login: accounts.clone(),
        authenticator: accounts,
        posts: posts.clone(),
        posts_query: posts,
        comments: comments.clone(),
        comments_query: comments,
        follows: Arc::new(FollowService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            clock,
        )),
        users: Arc::new(UserDirectoryService::new(store)),
    })
}

#[actix_web::test]
async fn register_post_follow_and_read_feed() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(http_state()))
            .wrap(Trace)
            .service(web::scope("/api").configure(configure_api)),
    )
    .await;

    let mut tokens = Vec::new();
    let mut ids = Vec::new();
    for name in ["alice", "bob"] {
        let credentials = json!({ "username": name, "password": "password123" });
        let registered: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        ids.push(registered["id"].as_str().expect("id").to_owned());
        let token: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/token")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        tokens.push(format!("Bearer {}", token["access"].as_str().expect("token")));
    }
    let (alice, bob) = (&tokens[0], &tokens[1]);

    let follow = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/users/{}/follow", ids[1]))
            .insert_header((AUTHORIZATION, alice.as_str()))
            .to_request(),
    )
    .await;
    assert_eq!(follow.status(), StatusCode::CREATED);

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((AUTHORIZATION, bob.as_str()))
            .set_json(json!({ "body": "hello followers" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert!(created.headers().contains_key("trace-id"));

    let feed: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/posts/feed")
            .insert_header((AUTHORIZATION, alice.as_str()))
            .to_request(),
    )
    .await;
    assert_eq!(feed["count"], 1);
    assert_eq!(feed["results"][0]["body"], "hello followers");
    assert_eq!(feed["results"][0]["author"]["followers_count"], 1);
}
