//! Builders wiring Diesel repositories and domain services into HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use social::domain::{
    AccountService, CommentService, FollowService, PostService, UserDirectoryService,
};
use social::inbound::http::state::{HttpState, HttpStatePorts};
use social::outbound::persistence::{
    DieselCommentRepository, DieselFollowRepository, DieselLikeRepository,
    DieselPostRepository, DieselUserRepository,
};
use social::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};

use super::ServerConfig;

fn build_token_codec(config: &ServerConfig, clock: Arc<dyn Clock>) -> JwtTokenCodec {
    match &config.jwt_secret {
        Some(secret) => JwtTokenCodec::new(secret.as_slice(), config.token_ttl, clock),
        None => {
            warn!("no JWT secret configured; tokens will not survive a restart");
            JwtTokenCodec::ephemeral(config.token_ttl, clock)
        }
    }
}

/// Build HTTP state with every port backed by PostgreSQL.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let pool = &config.db_pool;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let posts = Arc::new(DieselPostRepository::new(pool.clone()));
    let comments = Arc::new(DieselCommentRepository::new(pool.clone()));
    let likes = Arc::new(DieselLikeRepository::new(pool.clone(), Arc::clone(&clock)));
    let follows = Arc::new(DieselFollowRepository::new(pool.clone()));

    let accounts = Arc::new(AccountService::new(
        Arc::clone(&users),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(build_token_codec(config, Arc::clone(&clock))),
        Arc::clone(&clock),
    ));
    let post_service = Arc::new(PostService::new(
        Arc::clone(&posts),
        likes,
        Arc::clone(&clock),
    ));
    let comment_service = Arc::new(CommentService::new(comments, posts, Arc::clone(&clock)));
    let follow_service = Arc::new(FollowService::new(follows, Arc::clone(&users), clock));
    let directory = Arc::new(UserDirectoryService::new(users));

    HttpState::new(HttpStatePorts {
        registration: accounts.clone(),
        login: accounts.clone(),
        authenticator: accounts,
        posts: post_service.clone(),
        posts_query: post_service,
        comments: comment_service.clone(),
        comments_query: comment_service,
        follows: follow_service,
        users: directory,
    })
    .with_default_page_size(config.default_page_size)
}
