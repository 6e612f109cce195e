//! Translation of driven-port failures into domain errors.
//!
//! Connection failures surface as `503 Service Unavailable`; anything else a
//! repository reports is an internal error whose message is redacted at the
//! HTTP boundary.

use tracing::error;

use super::Error;
use super::ports::{
    CommentRepositoryError, FollowRepositoryError, LikeRepositoryError, PasswordHashError,
    PostRepositoryError, TokenError, UserPersistenceError,
};

fn unavailable(resource: &str, message: &str) -> Error {
    error!(resource, message, "repository unavailable");
    Error::service_unavailable(format!("{resource} repository unavailable"))
}

fn failed(resource: &str, message: &str) -> Error {
    error!(resource, message, "repository query failed");
    Error::internal(format!("{resource} repository error: {message}"))
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => unavailable("user", &message),
        UserPersistenceError::Query { message } => failed("user", &message),
        UserPersistenceError::DuplicateUsername { .. } => duplicate_username(),
    }
}

pub(crate) fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => unavailable("post", &message),
        PostRepositoryError::Query { message } => failed("post", &message),
    }
}

pub(crate) fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => unavailable("comment", &message),
        CommentRepositoryError::Query { message } => failed("comment", &message),
    }
}

pub(crate) fn map_like_error(error: LikeRepositoryError) -> Error {
    match error {
        LikeRepositoryError::Connection { message } => unavailable("like", &message),
        LikeRepositoryError::Query { message } => failed("like", &message),
        LikeRepositoryError::MissingReference { .. } => post_not_found(),
    }
}

pub(crate) fn map_follow_error(error: FollowRepositoryError) -> Error {
    match error {
        FollowRepositoryError::Connection { message } => unavailable("follow", &message),
        FollowRepositoryError::Query { message } => failed("follow", &message),
        FollowRepositoryError::MissingReference { .. } => user_not_found(),
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    error!(%error, "password hashing failed");
    Error::internal(error.to_string())
}

pub(crate) fn map_issue_error(error: TokenError) -> Error {
    error!(%error, "token issuance failed");
    Error::internal(error.to_string())
}

pub(crate) fn duplicate_username() -> Error {
    Error::invalid_request("A user with that username already exists.").with_details(
        serde_json::json!({ "field": "username", "code": "duplicate_username" }),
    )
}

pub(crate) fn post_not_found() -> Error {
    Error::not_found("Post not found.")
}

pub(crate) fn comment_not_found() -> Error {
    Error::not_found("Comment not found.")
}

pub(crate) fn user_not_found() -> Error {
    Error::not_found("User not found.")
}
