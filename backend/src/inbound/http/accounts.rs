//! Account API handlers: registration, token issuance and the caller's
//! own profile.
//!
//! ```text
//! POST /api/auth/register {"username":"alice","password":"password123"}
//! POST /api/auth/token {"username":"alice","password":"password123"}
//! GET /api/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::dto::{RegisteredUserResponse, TokenResponse, UserResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PASSWORD, USERNAME, credentials_error, require};

/// Credentials body shared by registration and token requests.
///
/// Example JSON:
/// `{"username":"alice","password":"password123"}`
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn into_parts(self) -> Result<(String, Zeroizing<String>), Error> {
        let username = require(self.username, USERNAME)?;
        let password = Zeroizing::new(require(self.password, PASSWORD)?);
        Ok((username, password))
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredUserResponse),
        (status = 400, description = "Invalid or duplicate username, or short password", body = Error),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let (username, password) = payload.into_inner().into_parts()?;
    let registration =
        Registration::try_from_parts(&username, &password).map_err(|err| credentials_error(&err))?;
    let user = state.registration.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisteredUserResponse::from(user)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/token",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing username or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "obtainToken",
    security([])
)]
#[post("/auth/token")]
pub async fn obtain_token(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let (username, password) = payload.into_inner().into_parts()?;
    let credentials = LoginCredentials::try_from_parts(&username, &password)
        .map_err(|err| credentials_error(&err))?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(TokenResponse::from(token)))
}

/// Return the authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Caller profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let profile = state.users.get_user(caller.id()).await?;
    Ok(web::Json(UserResponse::from(profile)))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
