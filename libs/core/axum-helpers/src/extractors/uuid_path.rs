//! UUID path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Extracts a single `{id}` path segment as a [`Uuid`].
///
/// A segment that does not parse is rejected with 400 `{"error":"malformatted id"}`
/// before the handler runs.
///
/// ```ignore
/// async fn get_blog(UuidPath(id): UuidPath) -> String {
///     format!("Blog ID: {}", id)
/// }
///
/// let app = Router::new().route("/blogs/{id}", get(get_blog));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Uuid::parse_str(&id)
            .map(UuidPath)
            .map_err(|_| AppError::InvalidId(id).into_response())
    }
}
