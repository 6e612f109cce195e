//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenCodec`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`LoginService`], [`RegistrationService`], [`Authenticator`]) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod authenticator;
mod comment_command;
mod comment_query;
mod comment_repository;
mod follow_command;
mod follow_repository;
mod like_repository;
mod login_service;
mod password_hasher;
mod post_command;
mod post_query;
mod post_repository;
mod readiness_probe;
mod registration_service;
mod token_codec;
mod user_repository;
mod users_query;

pub use authenticator::Authenticator;
#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use comment_command::CommentCommand;
#[cfg(test)]
pub use comment_command::MockCommentCommand;
pub use comment_query::CommentQuery;
#[cfg(test)]
pub use comment_query::MockCommentQuery;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use follow_command::FollowCommand;
#[cfg(test)]
pub use follow_command::MockFollowCommand;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use like_repository::MockLikeRepository;
pub use like_repository::{LikeRepository, LikeRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::PostCommand;
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::PostQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use readiness_probe::MockReadinessProbe;
pub use readiness_probe::ReadinessProbe;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
