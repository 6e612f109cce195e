//! HS256 JSON Web Token implementation of the `TokenCodec` port.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenCodec, TokenError};
use crate::domain::{AccessToken, UserId};

const SECRET_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies bearer tokens signed with a shared secret.
///
/// `iat` and `exp` are taken from the injected clock; expiry is checked
/// against wall time when verifying.
#[derive(Clone)]
pub struct JwtTokenCodec {
    secret: Arc<Zeroizing<Vec<u8>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtTokenCodec {
    /// Build a codec from a configured secret.
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: Arc::new(Zeroizing::new(secret.to_vec())),
            ttl,
            clock,
        }
    }

    /// Build a codec with a random per-process secret.
    ///
    /// Tokens stop verifying once the process restarts.
    pub fn ephemeral(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut secret = Zeroizing::new(vec![0_u8; SECRET_LEN]);
        rand::thread_rng().fill_bytes(secret.as_mut_slice());
        Self {
            secret: Arc::new(secret),
            ttl,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;
        validation
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_slice()),
        )
        .map_err(|err| TokenError::encode(err.to_string()))?;
        Ok(AccessToken {
            token,
            user_id: *user_id,
            expires_in: u64::try_from(self.ttl.num_seconds()).unwrap_or(0),
        })
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_slice()),
            &Self::validation(),
        )
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::expired(),
            _ => TokenError::invalid(err.to_string()),
        })?;
        UserId::new(&data.claims.sub).map_err(|err| TokenError::invalid(err.to_string()))
    }
}
