use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::validation::FieldError;

/// Message for a duplicate email, from either the pre-check or the store.
pub const EMAIL_EXISTS: &str = "Email already exists";
pub const USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Error)]
pub enum UserError {
    /// One or more input rules failed. Never empty.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// A uniqueness rule would be violated.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Storage failure other than a recognised constraint violation.
    /// The message is for logs, not clients.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl UserError {
    pub fn email_exists() -> Self {
        UserError::Conflict(EMAIL_EXISTS.to_string())
    }

    pub fn not_found() -> Self {
        UserError::NotFound(USER_NOT_FOUND.to_string())
    }
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(errors) => AppError::Validation(
                serde_json::to_value(&errors).unwrap_or(serde_json::Value::Null),
            ),
            UserError::Conflict(msg) => AppError::Conflict(msg),
            UserError::NotFound(msg) => AppError::NotFound(msg),
            UserError::Infrastructure(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
