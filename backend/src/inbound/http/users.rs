//! User directory and follow handlers.
//!
//! ```text
//! GET /api/users
//! GET /api/users/{user_id}
//! POST /api/users/{user_id}/follow
//! DELETE /api/users/{user_id}/follow
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use pagination::{PageParams, Paginated};

use crate::domain::{Error, FollowOutcome, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::dto::{FollowResponse, UserResponse};
use crate::inbound::http::paging::{page_request, paginated};
use crate::inbound::http::schemas::PaginatedUsers;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

const USER_ID: FieldName = FieldName::new("user_id");

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    parse_uuid(raw, USER_ID).map(UserId::from)
}

/// List users in join order with follower and following counts.
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, capped at 100"),
        ("offset" = Option<u64>, Query, description = "Rows to skip")
    ),
    responses(
        (status = 200, description = "Users", body = PaginatedUsers),
        (status = 400, description = "Invalid pagination parameters", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<UserResponse>>> {
    let page = page_request(params.into_inner(), state.default_page_size)?;
    let users = state.users.list_users(page).await?;
    Ok(web::Json(paginated(&req, users, UserResponse::from)?))
}

/// Fetch one user's public profile.
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = parse_user_id(&path)?;
    let profile = state.users.get_user(&user_id).await?;
    Ok(web::Json(UserResponse::from(profile)))
}

/// Follow a user. `201` when the relation is new, `200` when it existed.
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/follow",
    params(("user_id" = String, Path, description = "User to follow")),
    responses(
        (status = 201, description = "Now following", body = FollowResponse),
        (status = 200, description = "Already following", body = FollowResponse),
        (status = 400, description = "Attempt to follow oneself", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "followUser"
)]
#[post("/users/{user_id}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    let outcome = state.follows.follow(caller.id(), &target).await?;
    let response = match outcome {
        FollowOutcome::Created(view) => HttpResponse::Created().json(FollowResponse::from(view)),
        FollowOutcome::Existing(view) => HttpResponse::Ok().json(FollowResponse::from(view)),
    };
    Ok(response)
}

/// Stop following a user. Always `204`, even if no relation existed.
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/follow",
    params(("user_id" = String, Path, description = "User to unfollow")),
    responses(
        (status = 204, description = "Not following"),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["users"],
    operation_id = "unfollowUser"
)]
#[delete("/users/{user_id}/follow")]
pub async fn unfollow_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    state.follows.unfollow(caller.id(), &target).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
