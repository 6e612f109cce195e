//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod comments;
pub mod dto;
pub mod error;
pub mod health;
mod paging;
pub mod posts;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every API handler on `cfg`.
///
/// Mount under the `/api` scope. `/posts/feed` is registered ahead of
/// `/posts/{post_id}` so the literal segment wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .service(accounts::register)
        .service(accounts::obtain_token)
        .service(accounts::current_user)
        .service(posts::feed)
        .service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(posts::like_post)
        .service(posts::unlike_post)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(comments::get_comment)
        .service(comments::update_comment)
        .service(comments::delete_comment)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::follow_user)
        .service(users::unfollow_user);
}
