//! Tests for the account service.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockPasswordHasher, MockTokenCodec, MockUserRepository, StoredCredentials,
    UserPersistenceError,
};
use crate::domain::UserProfile;

fn service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenCodec,
) -> AccountService<MockUserRepository, MockPasswordHasher, MockTokenCodec> {
    AccountService::new(
        Arc::new(users),
        Arc::new(hasher),
        Arc::new(tokens),
        Arc::new(DefaultClock),
    )
}

fn registration() -> Registration {
    Registration::try_from_parts("alice", "password123").expect("valid registration")
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("Alice", "password123").expect("valid credentials")
}

fn profile(id: UserId) -> UserProfile {
    UserProfile {
        id,
        username: "alice".to_owned(),
        followers_count: 0,
        following_count: 0,
    }
}

#[tokio::test]
async fn register_hashes_password_and_persists_user() {
    let mut users = MockUserRepository::new();
    users.expect_username_exists().return_once(|_| Ok(false));
    users
        .expect_create()
        .withf(|user, hash| user.username.as_ref() == "alice" && hash == "hashed:password123")
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(format!("hashed:{password}")));

    let user = service(users, hasher, MockTokenCodec::new())
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(user.username.as_ref(), "alice");
}

#[tokio::test]
async fn register_rejects_taken_username_before_hashing() {
    let mut users = MockUserRepository::new();
    users.expect_username_exists().return_once(|_| Ok(true));
    users.expect_create().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let err = service(users, hasher, MockTokenCodec::new())
        .register(registration())
        .await
        .expect_err("duplicate username");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn register_maps_unique_violation_race_to_invalid_request() {
    let mut users = MockUserRepository::new();
    users.expect_username_exists().return_once(|_| Ok(false));
    users
        .expect_create()
        .return_once(|_, _| Err(UserPersistenceError::duplicate_username("alice")));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().returning(|_| Ok("hash".to_owned()));

    let err = service(users, hasher, MockTokenCodec::new())
        .register(registration())
        .await
        .expect_err("duplicate username");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.detail(), "A user with that username already exists.");
}

#[tokio::test]
async fn register_maps_connection_failure_to_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_username_exists()
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let err = service(users, MockPasswordHasher::new(), MockTokenCodec::new())
        .register(registration())
        .await
        .expect_err("connection failure");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn login_issues_token_for_valid_password() {
    let user_id = UserId::random();
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials()
        .withf(|username| username == "Alice")
        .return_once(move |_| {
            Ok(Some(StoredCredentials {
                user_id,
                password_hash: "hash".to_owned(),
            }))
        });
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(true));
    let mut tokens = MockTokenCodec::new();
    tokens.expect_issue().returning(|id| {
        Ok(AccessToken {
            token: "signed".to_owned(),
            user_id: *id,
            expires_in: 3600,
        })
    });

    let token = service(users, hasher, tokens)
        .login(&credentials())
        .await
        .expect("login succeeds");

    assert_eq!(token.user_id, user_id);
    assert_eq!(token.token, "signed");
}

#[rstest]
#[case::unknown_user(None, false)]
#[case::wrong_password(Some("hash"), false)]
#[tokio::test]
async fn login_failures_are_indistinguishable(
    #[case] stored_hash: Option<&'static str>,
    #[case] verifies: bool,
) {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().return_once(move |_| {
        Ok(stored_hash.map(|hash| StoredCredentials {
            user_id: UserId::random(),
            password_hash: hash.to_owned(),
        }))
    });
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(move |_, _| Ok(verifies));
    let mut tokens = MockTokenCodec::new();
    tokens.expect_issue().times(0);

    let err = service(users, hasher, tokens)
        .login(&credentials())
        .await
        .expect_err("login rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.detail(), INVALID_CREDENTIALS);
}

#[rstest]
#[case(TokenError::expired())]
#[case(TokenError::invalid("bad signature"))]
#[tokio::test]
async fn authenticate_rejects_unverifiable_tokens(#[case] failure: TokenError) {
    let mut tokens = MockTokenCodec::new();
    tokens.expect_verify().return_once(move |_| Err(failure));

    let err = service(MockUserRepository::new(), MockPasswordHasher::new(), tokens)
        .authenticate("token")
        .await
        .expect_err("token rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn authenticate_rejects_tokens_for_deleted_users() {
    let mut tokens = MockTokenCodec::new();
    tokens.expect_verify().returning(|_| Ok(UserId::random()));
    let mut users = MockUserRepository::new();
    users.expect_find_profile().return_once(|_| Ok(None));

    let err = service(users, MockPasswordHasher::new(), tokens)
        .authenticate("token")
        .await
        .expect_err("subject missing");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn authenticate_returns_existing_subject() {
    let user_id = UserId::random();
    let mut tokens = MockTokenCodec::new();
    tokens.expect_verify().returning(move |_| Ok(user_id));
    let mut users = MockUserRepository::new();
    users
        .expect_find_profile()
        .return_once(move |id| Ok(Some(profile(*id))));

    let resolved = service(users, MockPasswordHasher::new(), tokens)
        .authenticate("token")
        .await
        .expect("token accepted");

    assert_eq!(resolved, user_id);
}
