//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::DEFAULT_LIMIT;

use crate::domain::ports::{
    Authenticator, CommentCommand, CommentQuery, FollowCommand, LoginService, PostCommand,
    PostQuery, RegistrationService, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub comments: Arc<dyn CommentCommand>,
    pub comments_query: Arc<dyn CommentQuery>,
    pub follows: Arc<dyn FollowCommand>,
    pub users: Arc<dyn UsersQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub comments: Arc<dyn CommentCommand>,
    pub comments_query: Arc<dyn CommentQuery>,
    pub follows: Arc<dyn FollowCommand>,
    pub users: Arc<dyn UsersQuery>,
    /// Page size applied when a list request omits `limit`.
    pub default_page_size: u32,
}

impl HttpState {
    /// Construct state from port implementations using the default page size.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            registration,
            login,
            authenticator,
            posts,
            posts_query,
            comments,
            comments_query,
            follows,
            users,
        } = ports;
        Self {
            registration,
            login,
            authenticator,
            posts,
            posts_query,
            comments,
            comments_query,
            follows,
            users,
            default_page_size: DEFAULT_LIMIT,
        }
    }

    /// Override the page size used when clients omit `limit`.
    #[must_use]
    pub const fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }
}
