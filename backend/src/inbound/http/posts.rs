//! Post API handlers: CRUD, likes and the personalised feed.
//!
//! ```text
//! GET /api/posts?limit=20&offset=0
//! POST /api/posts {"body":"hello"}
//! GET /api/posts/feed
//! PATCH /api/posts/{post_id} {"body":"edited"}
//! POST /api/posts/{post_id}/like
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, route, web};
use pagination::{PageParams, Paginated};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, PostBody, PostChanges, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::dto::{DetailResponse, PostResponse};
use crate::inbound::http::paging::{page_request, paginated};
use crate::inbound::http::schemas::PaginatedPosts;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{BODY, FieldName, body_error, parse_uuid, require};

const POST_ID: FieldName = FieldName::new("post_id");
const UNLIKED: &str = "unliked";

/// Request body for creating a post.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "Hello from the feed")]
    pub body: Option<String>,
}

/// Partial update body; omitted fields are left unchanged.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdatePostRequest {
    pub body: Option<String>,
}

pub(crate) fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    parse_uuid(raw, POST_ID).map(PostId::from)
}

fn parse_body(raw: String) -> Result<PostBody, Error> {
    PostBody::new(raw).map_err(|err| body_error(BODY, &err))
}

/// List every post, newest first.
#[utoipa::path(
    get,
    path = "/api/posts",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, capped at 100"),
        ("offset" = Option<u64>, Query, description = "Rows to skip")
    ),
    responses(
        (status = 200, description = "Posts", body = PaginatedPosts),
        (status = 400, description = "Invalid pagination parameters", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<PostResponse>>> {
    let page = page_request(params.into_inner(), state.default_page_size)?;
    let posts = state.posts_query.list(page).await?;
    Ok(web::Json(paginated(&req, posts, PostResponse::from)?))
}

/// Create a post authored by the caller.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing, blank or overlong body", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let body = parse_body(require(payload.into_inner().body, BODY)?)?;
    let view = state.posts.create(caller.id(), body).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(view)))
}

/// Posts by the caller and by everyone the caller follows, newest first.
#[utoipa::path(
    get,
    path = "/api/posts/feed",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, capped at 100"),
        ("offset" = Option<u64>, Query, description = "Rows to skip")
    ),
    responses(
        (status = 200, description = "Feed", body = PaginatedPosts),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["posts"],
    operation_id = "feed"
)]
#[get("/posts/feed")]
pub async fn feed(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<PostResponse>>> {
    let page = page_request(params.into_inner(), state.default_page_size)?;
    let posts = state.posts_query.feed(caller.id(), page).await?;
    Ok(web::Json(paginated(&req, posts, PostResponse::from)?))
}

/// Fetch a single post.
#[utoipa::path(
    get,
    path = "/api/posts/{post_id}",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([])
)]
#[get("/posts/{post_id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostResponse>> {
    let post_id = parse_post_id(&path)?;
    let view = state.posts_query.get(&post_id).await?;
    Ok(web::Json(PostResponse::from(view)))
}

/// Edit a post; only its author may do so.
#[utoipa::path(
    patch,
    path = "/api/posts/{post_id}",
    params(("post_id" = String, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Blank or overlong body", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[patch("/posts/{post_id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let post_id = parse_post_id(&path)?;
    // A missing post or a foreign author outranks an invalid body.
    let changes = match payload.into_inner().body.map(parse_body).transpose() {
        Ok(body) => PostChanges { body },
        Err(invalid) => {
            state.posts.ensure_author(caller.id(), &post_id).await?;
            return Err(invalid);
        }
    };
    let view = state.posts.update(caller.id(), &post_id, changes).await?;
    Ok(web::Json(PostResponse::from(view)))
}

/// Delete a post together with its comments and likes.
#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{post_id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    state.posts.delete(caller.id(), &post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Like a post. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/like",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "`liked` or `already liked`", body = DetailResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "likePost"
)]
#[post("/posts/{post_id}/like")]
pub async fn like_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DetailResponse>> {
    let post_id = parse_post_id(&path)?;
    let outcome = state.posts.like(caller.id(), &post_id).await?;
    Ok(web::Json(DetailResponse::new(outcome.detail())))
}

/// Remove the caller's like. Succeeds whether or not a like existed.
#[utoipa::path(
    method(post, delete),
    path = "/api/posts/{post_id}/unlike",
    params(("post_id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "`unliked`", body = DetailResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "unlikePost"
)]
#[route("/posts/{post_id}/unlike", method = "POST", method = "DELETE")]
pub async fn unlike_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DetailResponse>> {
    let post_id = parse_post_id(&path)?;
    state.posts.unlike(caller.id(), &post_id).await?;
    Ok(web::Json(DetailResponse::new(UNLIKED)))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
