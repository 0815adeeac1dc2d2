use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, AuthError};
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("username must be unique")]
    UsernameTaken,

    #[error("password has to be more than 3 characters")]
    PasswordTooShort,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("user {} not found", id)),
            UserError::UsernameTaken | UserError::PasswordTooShort => {
                AppError::BadRequest(err.to_string())
            }
            UserError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            UserError::Database(msg) => AppError::Database(msg),
            UserError::PasswordHash(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        // the unique username index backs up the check-then-insert in the service
        match *err.kind {
            ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY => {
                UserError::UsernameTaken
            }
            _ => UserError::Database(err.to_string()),
        }
    }
}

impl From<AuthError> for UserError {
    fn from(err: AuthError) -> Self {
        UserError::Internal(err.to_string())
    }
}
