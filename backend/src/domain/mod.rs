//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities shared by the HTTP and persistence
//! adapters, and the services that implement the driving ports on top of the
//! driven repository ports.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - User, Post, Comment, Follow: aggregates with their annotated views.
//! - AccountService, PostService, CommentService, FollowService,
//!   UserDirectoryService: driving port implementations.

pub mod account_service;
pub mod auth;
pub mod comment;
pub mod comment_service;
pub mod error;
pub mod follow;
pub mod follow_service;
pub mod ownership;
pub mod ports;
pub mod post;
pub mod post_service;
pub(crate) mod repository_errors;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, CredentialsValidationError, LoginCredentials, PASSWORD_MIN, Registration,
};
pub use self::comment::{
    COMMENT_BODY_MAX, Comment, CommentBody, CommentChanges, CommentId, CommentView,
};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode};
pub use self::follow::{Follow, FollowOutcome, FollowView};
pub use self::follow_service::{FollowService, SELF_FOLLOW};
pub use self::ownership::{Access, Owned, authorize};
pub use self::post::{
    BodyValidationError, LikeOutcome, POST_BODY_MAX, Post, PostBody, PostChanges, PostId,
    PostView,
};
pub use self::post_service::PostService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, User, UserId, UserProfile, UserValidationError, Username};
pub use self::user_directory_service::UserDirectoryService;

