use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, AuthError};
use domain_users::UserError;
use thiserror::Error;
use uuid::Uuid;

pub const ONLY_CREATOR_CAN_REMOVE: &str = "Only creator can remove post";
pub const ONLY_CREATOR_CAN_UPDATE: &str = "Only creator can update post";

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Blog not found: {0}")]
    NotFound(Uuid),

    /// Id that is malformed or names no stored blog on update/delete
    #[error("malformatted id")]
    MalformedId,

    /// `title` or `url` absent
    #[error("bad request")]
    MissingFields,

    #[error("{0}")]
    NotOwner(&'static str),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BlogResult<T> = Result<T, BlogError>;

impl From<BlogError> for AppError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::NotFound(id) => AppError::NotFound(format!("blog {} not found", id)),
            BlogError::MalformedId => AppError::InvalidId("no such blog".to_string()),
            BlogError::MissingFields => AppError::BadRequest(err.to_string()),
            BlogError::NotOwner(msg) => AppError::BadRequest(msg.to_string()),
            BlogError::Unauthorized(msg) => AppError::Unauthorized(msg),
            BlogError::Database(msg) => AppError::Database(msg),
            BlogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for BlogError {
    fn from(err: mongodb::error::Error) -> Self {
        BlogError::Database(err.to_string())
    }
}

impl From<AuthError> for BlogError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) | AuthError::MissingSubject => {
                BlogError::Unauthorized(err.to_string())
            }
            AuthError::Issue(msg) => BlogError::Internal(msg),
        }
    }
}

impl From<UserError> for BlogError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Database(msg) => BlogError::Database(msg),
            other => BlogError::Internal(other.to_string()),
        }
    }
}

impl From<BlogError> for UserError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::Database(msg) => UserError::Database(msg),
            other => UserError::Internal(other.to_string()),
        }
    }
}
