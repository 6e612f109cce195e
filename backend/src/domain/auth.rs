//! Authentication primitives: login credentials, registration input and
//! issued access tokens.
//!
//! Handlers build these from raw strings so services only ever see validated
//! values. Passwords are held in [`Zeroizing`] buffers and never logged.

use std::fmt;

use zeroize::Zeroizing;

use super::{UserId, UserValidationError, Username};

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors raised for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum permitted length.
        min: usize,
    },
    /// Username failed validation.
    #[error(transparent)]
    Username(#[from] UserValidationError),
}

impl CredentialsValidationError {
    /// Name of the payload field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::Username(_) => "username",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }
}

/// Credentials presented to obtain an access token.
///
/// # Examples
/// ```
/// use social::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "password123").expect("valid");
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(creds.password(), "password123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed username as supplied.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password as supplied.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated sign-up request.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules.
/// - `password` is at least [`PASSWORD_MIN`] characters.
#[derive(Clone)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw sign-up inputs.
    ///
    /// # Examples
    /// ```
    /// use social::domain::{CredentialsValidationError, Registration};
    ///
    /// assert!(Registration::try_from_parts("alice", "secret1").is_ok());
    /// assert_eq!(
    ///     Registration::try_from_parts("alice", "short").err(),
    ///     Some(CredentialsValidationError::PasswordTooShort { min: 6 })
    /// );
    /// ```
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plain-text password awaiting hashing.
    #[must_use]
    pub fn password(&self) -> &Zeroizing<String> {
        &self.password
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed bearer credential issued after a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Encoded token presented as `Authorization: Bearer <token>`.
    pub token: String,
    /// Subject the token authenticates.
    pub user_id: UserId,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("user_id", &self.user_id)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}
