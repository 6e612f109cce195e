//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose `details` carry the
//! offending `field` and a stable `code`, so clients can highlight inputs.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{BodyValidationError, CredentialsValidationError, Error, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    Blank,
    TooLong,
    InvalidUsername,
    PasswordTooShort,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::Blank => "blank",
            Self::TooLong => "too_long",
            Self::InvalidUsername => "invalid_username",
            Self::PasswordTooShort => "password_too_short",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const BODY: FieldName = FieldName::new("body");
pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    ValidationError::new(field, format!("{}: This field is required.", field.as_str()))
        .with_code(ErrorCode::MissingField)
}

/// Require an optional payload field, reporting it as missing otherwise.
pub(crate) fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        ValidationError::new(field, format!("{} must be a valid UUID", field.as_str()))
            .with_value(ErrorCode::InvalidUuid, value)
    })
}

pub(crate) fn body_error(field: FieldName, error: &BodyValidationError) -> Error {
    let code = match error {
        BodyValidationError::Blank => ErrorCode::Blank,
        BodyValidationError::TooLong { .. } => ErrorCode::TooLong,
    };
    ValidationError::new(field, error.to_string()).with_code(code)
}

pub(crate) fn credentials_error(error: &CredentialsValidationError) -> Error {
    let code = match error {
        CredentialsValidationError::EmptyUsername
        | CredentialsValidationError::Username(UserValidationError::EmptyUsername) => {
            ErrorCode::MissingField
        }
        CredentialsValidationError::EmptyPassword => ErrorCode::MissingField,
        CredentialsValidationError::PasswordTooShort { .. } => ErrorCode::PasswordTooShort,
        CredentialsValidationError::Username(_) => ErrorCode::InvalidUsername,
    };
    let field = match error.field() {
        "password" => PASSWORD,
        _ => USERNAME,
    };
    ValidationError::new(field, error.to_string()).with_code(code)
}
