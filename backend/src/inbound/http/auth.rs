//! Bearer-token extractor keeping credential handling out of handlers.
//!
//! Handlers that mutate state take an [`AuthenticatedUser`] argument. The
//! extractor reads `Authorization: Bearer <token>`, resolves it through the
//! [`Authenticator`](crate::domain::ports::Authenticator) port held in
//! [`HttpState`] and rejects the request with `401` otherwise.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};

use super::state::HttpState;

const BEARER: &str = "bearer";
const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided.";
const MALFORMED_HEADER: &str = "Authorization header must contain a bearer token.";

/// Caller identity resolved from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// Identifier of the authenticated caller.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized(MISSING_CREDENTIALS))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized(MALFORMED_HEADER))?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case(BEARER) => {
            Ok(token.to_owned())
        }
        _ => Err(Error::unauthorized(MALFORMED_HEADER)),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered with the app"))?;
            let token = token?;
            let user_id = state.authenticator.authenticate(&token).await?;
            Ok(Self(user_id))
        })
    }
}
