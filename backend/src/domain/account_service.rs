//! Account domain service: registration, login and token authentication.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    Authenticator, LoginService, PasswordHasher, RegistrationService, TokenCodec, TokenError,
    UserRepository,
};
use crate::domain::repository_errors::{
    duplicate_username, map_hash_error, map_issue_error, map_user_error,
};
use crate::domain::{
    AccessToken, Error, LoginCredentials, Registration, TraceId, User, UserId,
};

const INVALID_CREDENTIALS: &str = "No active account found with the given credentials.";
const INVALID_TOKEN: &str = "Given token not valid for any user.";

fn blocking_join_error(error: tokio::task::JoinError) -> Error {
    Error::internal(format!("password hashing task failed: {error}"))
}

/// Account service implementing the registration, login and authenticator
/// driving ports.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create the service from its driven ports.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

#[async_trait]
impl<U, H, T> RegistrationService for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        if self
            .users
            .username_exists(registration.username())
            .await
            .map_err(map_user_error)?
        {
            return Err(duplicate_username());
        }

        let hasher = Arc::clone(&self.hasher);
        let password = registration.password().clone();
        let password_hash = TraceId::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(blocking_join_error)?
            .map_err(map_hash_error)?;

        let user = User {
            id: UserId::random(),
            username: registration.username().clone(),
            date_joined: self.clock.utc(),
        };
        self.users
            .create(&user, &password_hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, username = %user.username, "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, H, T> LoginService for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Some(stored) = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            warn!(username = credentials.username(), "login rejected: unknown user");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(credentials.password().to_owned());
        let hash = stored.password_hash;
        let verified = TraceId::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(blocking_join_error)?
            .map_err(map_hash_error)?;
        if !verified {
            warn!(user_id = %stored.user_id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self
            .tokens
            .issue(&stored.user_id)
            .map_err(map_issue_error)?;
        info!(user_id = %stored.user_id, "access token issued");
        Ok(token)
    }
}

#[async_trait]
impl<U, H, T> Authenticator for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    async fn authenticate(&self, token: &str) -> Result<UserId, Error> {
        let user_id = self.tokens.verify(token).map_err(|error| {
            match &error {
                TokenError::Expired => warn!("bearer token expired"),
                other => warn!(error = %other, "bearer token rejected"),
            }
            Error::unauthorized(INVALID_TOKEN)
        })?;
        self.users
            .find_profile(&user_id)
            .await
            .map_err(map_user_error)?
            .map(|profile| profile.id)
            .ok_or_else(|| {
                warn!(%user_id, "bearer token subject no longer exists");
                Error::unauthorized(INVALID_TOKEN)
            })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
