//! Port for issuing and verifying bearer access tokens.

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "access token is invalid: {message}",
        /// The token verified but has expired.
        Expired => "access token has expired",
        /// Signing a new token failed.
        Encode { message: String } => "access token could not be issued: {message}",
    }
}

/// Port for the access-token format.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Issue a token authenticating `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenError>;

    /// Verify `token` and return the subject it authenticates.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
