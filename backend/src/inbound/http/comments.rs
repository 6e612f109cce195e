//! Comment API handlers, nested under their parent post.
//!
//! ```text
//! GET /api/posts/{post_id}/comments
//! POST /api/posts/{post_id}/comments {"body":"nice"}
//! PATCH /api/posts/{post_id}/comments/{comment_id} {"body":"edited"}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::{PageParams, Paginated};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CommentBody, CommentChanges, CommentId, Error, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::dto::CommentResponse;
use crate::inbound::http::paging::{page_request, paginated};
use crate::inbound::http::posts::parse_post_id;
use crate::inbound::http::schemas::PaginatedComments;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{BODY, FieldName, body_error, parse_uuid, require};

const COMMENT_ID: FieldName = FieldName::new("comment_id");

/// Request body for creating a comment.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateCommentRequest {
    #[schema(example = "Nice post!")]
    pub body: Option<String>,
}

/// Partial update body; omitted fields are left unchanged.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateCommentRequest {
    pub body: Option<String>,
}

fn parse_ids(raw: &(String, String)) -> Result<(PostId, CommentId), Error> {
    let post_id = parse_post_id(&raw.0)?;
    let comment_id = parse_uuid(&raw.1, COMMENT_ID).map(CommentId::from)?;
    Ok((post_id, comment_id))
}

fn parse_body(raw: String) -> Result<CommentBody, Error> {
    CommentBody::new(raw).map_err(|err| body_error(BODY, &err))
}

/// List a post's comments, oldest first.
#[utoipa::path(
    get,
    path = "/api/posts/{post_id}/comments",
    params(
        ("post_id" = String, Path, description = "Post identifier"),
        ("limit" = Option<u32>, Query, description = "Page size, capped at 100"),
        ("offset" = Option<u64>, Query, description = "Rows to skip")
    ),
    responses(
        (status = 200, description = "Comments", body = PaginatedComments),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("/posts/{post_id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<CommentResponse>>> {
    let post_id = parse_post_id(&path)?;
    let page = page_request(params.into_inner(), state.default_page_size)?;
    let comments = state.comments_query.list(&post_id, page).await?;
    Ok(web::Json(paginated(&req, comments, CommentResponse::from)?))
}

/// Comment on a post as the caller.
#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/comments",
    params(("post_id" = String, Path, description = "Post identifier")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Missing, blank or overlong body", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/posts/{post_id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let body = parse_body(require(payload.into_inner().body, BODY)?)?;
    let view = state.comments.create(caller.id(), &post_id, body).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(view)))
}

/// Fetch one comment of a post.
#[utoipa::path(
    get,
    path = "/api/posts/{post_id}/comments/{comment_id}",
    params(
        ("post_id" = String, Path, description = "Post identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Comment", body = CommentResponse),
        (status = 404, description = "No such post or comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "getComment",
    security([])
)]
#[get("/posts/{post_id}/comments/{comment_id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<CommentResponse>> {
    let (post_id, comment_id) = parse_ids(&path)?;
    let view = state.comments_query.get(&post_id, &comment_id).await?;
    Ok(web::Json(CommentResponse::from(view)))
}

/// Edit a comment; only its author may do so.
#[utoipa::path(
    patch,
    path = "/api/posts/{post_id}/comments/{comment_id}",
    params(
        ("post_id" = String, Path, description = "Post identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Blank or overlong body", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "No such post or comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[patch("/posts/{post_id}/comments/{comment_id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateCommentRequest>,
) -> ApiResult<web::Json<CommentResponse>> {
    let (post_id, comment_id) = parse_ids(&path)?;
    let changes = match payload.into_inner().body.map(parse_body).transpose() {
        Ok(body) => CommentChanges { body },
        Err(invalid) => {
            state
                .comments
                .ensure_author(caller.id(), &post_id, &comment_id)
                .await?;
            return Err(invalid);
        }
    };
    let view = state
        .comments
        .update(caller.id(), &post_id, &comment_id, changes)
        .await?;
    Ok(web::Json(CommentResponse::from(view)))
}

/// Delete a comment; only its author may do so.
#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}/comments/{comment_id}",
    params(
        ("post_id" = String, Path, description = "Post identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "No such post or comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/posts/{post_id}/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (post_id, comment_id) = parse_ids(&path)?;
    state
        .comments
        .delete(caller.id(), &post_id, &comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "comments_tests.rs"]
mod tests;
