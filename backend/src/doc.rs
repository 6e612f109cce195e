//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every handler in the inbound HTTP layer plus the health probes
//! - **Schemas**: request and response DTOs, the list envelopes from
//!   [`crate::inbound::http::schemas`] and the domain error payload
//! - **Security**: bearer JWT authentication, overridden to none on public
//!   endpoints
//!
//! The document is served at `GET /api/schema`, rendered by Swagger UI in
//! debug builds, and exported via `cargo run --bin openapi-dump`.

use actix_web::{HttpResponse, get};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::CredentialsRequest;
use crate::inbound::http::comments::{CreateCommentRequest, UpdateCommentRequest};
use crate::inbound::http::dto::{
    CommentResponse, DetailResponse, FollowResponse, PostResponse, RegisteredUserResponse,
    TokenResponse, UserResponse,
};
use crate::inbound::http::posts::{CreatePostRequest, UpdatePostRequest};
use crate::inbound::http::schemas::{PaginatedComments, PaginatedPosts, PaginatedUsers};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("Access token issued by POST /api/auth/token."))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Social backend API",
        description = "Accounts, posts, comments, likes, follows and a personalised feed."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::obtain_token,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::feed,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::like_post,
        crate::inbound::http::posts::unlike_post,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::get_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::follow_user,
        crate::inbound::http::users::unfollow_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CredentialsRequest,
        CreatePostRequest,
        UpdatePostRequest,
        CreateCommentRequest,
        UpdateCommentRequest,
        UserResponse,
        RegisteredUserResponse,
        TokenResponse,
        PostResponse,
        CommentResponse,
        FollowResponse,
        DetailResponse,
        PaginatedPosts,
        PaginatedComments,
        PaginatedUsers,
        Error,
        ErrorCode
    )),
    tags(
        (name = "auth", description = "Registration and token issue"),
        (name = "posts", description = "Posts, likes and the feed"),
        (name = "comments", description = "Comments nested under a post"),
        (name = "users", description = "User directory and follows"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
#[get("/api/schema")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
