//! Caller identity
//!
//! Authentication happens in an upstream proxy, which forwards the
//! authenticated user in the `x-user-id` header. Handlers take a [`UserId`]
//! argument to require it.

use axum::{extract::FromRequestParts, http::request::Parts};
use thiserror::Error;

use crate::error::AppError;

/// Header carrying the authenticated user
pub const USER_HEADER: &str = "x-user-id";

pub const MAX_USER_ID_LENGTH: usize = 128;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserIdError {
    #[error("The {USER_HEADER} header is required")]
    Missing,

    #[error("The {USER_HEADER} header must not exceed {MAX_USER_ID_LENGTH} characters")]
    TooLong,

    #[error("The {USER_HEADER} header contains invalid characters")]
    InvalidFormat,
}

/// Validate a user id
///
/// # Rules
/// - Must not be empty after trimming
/// - Must not exceed [`MAX_USER_ID_LENGTH`] characters
/// - Must not contain control characters
pub fn validate_user_id(raw: &str) -> Result<&str, UserIdError> {
    let user_id = raw.trim();
    if user_id.is_empty() {
        return Err(UserIdError::Missing);
    }
    if user_id.chars().count() > MAX_USER_ID_LENGTH {
        return Err(UserIdError::TooLong);
    }
    if user_id.chars().any(char::is_control) {
        return Err(UserIdError::InvalidFormat);
    }
    Ok(user_id)
}

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| AppError::Unauthorized(UserIdError::Missing.to_string()))?;

        let raw = header
            .to_str()
            .map_err(|_| AppError::Unauthorized(UserIdError::InvalidFormat.to_string()))?;

        let user_id =
            validate_user_id(raw).map_err(|e| AppError::Unauthorized(e.to_string()))?;

        Ok(UserId(user_id.to_string()))
    }
}
