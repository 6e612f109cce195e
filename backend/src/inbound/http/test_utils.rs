//! Test helpers for inbound HTTP components.
//!
//! [`TestContext`] wires the real domain services over the in-memory store,
//! a cheap Argon2 configuration and a JWT codec, so handler tests exercise
//! the same code paths as production minus PostgreSQL.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::TimeDelta;
use mockable::DefaultClock;
use serde_json::Value;

use crate::Trace;
use crate::domain::{
    AccountService, CommentService, FollowService, LoginCredentials, PostService, Registration,
    UserDirectoryService, UserId,
};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use crate::test_support::{InMemorySocialStore, SteppingClock};

use super::configure_api;
use super::state::{HttpState, HttpStatePorts};

/// Password used for every account created through [`TestContext::user`].
pub const PASSWORD: &str = "password123";

/// Registered account together with a bearer token.
pub struct TestUser {
    pub id: UserId,
    pub token: String,
}

impl TestUser {
    /// `Authorization` header authenticating as this user.
    pub fn bearer(&self) -> (actix_web::http::header::HeaderName, String) {
        (AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

/// Application state backed by an in-memory store.
pub struct TestContext {
    pub store: Arc<InMemorySocialStore>,
    pub clock: Arc<SteppingClock>,
    pub state: HttpState,
}

impl TestContext {
    /// Wire every port to services over a fresh store.
    pub fn new() -> Self {
        let store = Arc::new(InMemorySocialStore::new());
        let clock = Arc::new(SteppingClock::default());
        let hasher = Arc::new(
            Argon2PasswordHasher::with_params(256, 1, 1).expect("cheap argon2 parameters"),
        );
        // Token expiry is checked against wall time, so issue with the real clock.
        let tokens = Arc::new(JwtTokenCodec::new(
            b"http-test-secret",
            TimeDelta::minutes(5),
            Arc::new(DefaultClock),
        ));
        let accounts = Arc::new(AccountService::new(
            Arc::clone(&store),
            hasher,
            tokens,
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
        let follows = Arc::new(FollowService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            clock.clone(),
        ));
        let users = Arc::new(UserDirectoryService::new(Arc::clone(&store)));
        let state = HttpState::new(HttpStatePorts {
            registration: accounts.clone(),
            login: accounts.clone(),
            authenticator: accounts,
            posts: posts.clone(),
            posts_query: posts,
            comments: comments.clone(),
            comments_query: comments,
            follows,
            users,
        });
        Self {
            store,
            clock,
            state,
        }
    }

    /// Register `username` and log in, returning its id and token.
    pub async fn user(&self, username: &str) -> TestUser {
        let registration =
            Registration::try_from_parts(username, PASSWORD).expect("valid registration");
        let user = self
            .state
            .registration
            .register(registration)
            .await
            .expect("registration succeeds");
        let credentials =
            LoginCredentials::try_from_parts(username, PASSWORD).expect("valid credentials");
        let token = self
            .state
            .login
            .login(&credentials)
            .await
            .expect("login succeeds");
        TestUser {
            id: user.id,
            token: token.token,
        }
    }

    /// Full application as mounted by the server, minus health probes.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .service(web::scope("/api").configure(configure_api))
    }

    /// Send `request` through a fresh app over the shared state.
    ///
    /// Empty bodies such as `204` responses decode to `Value::Null`.
    pub async fn send(&self, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(self.app()).await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let bytes = actix_test::read_body(response).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };
        (status, body)
    }
}
