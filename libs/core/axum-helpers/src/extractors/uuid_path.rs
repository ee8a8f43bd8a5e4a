use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// Single `{id}` path segment parsed as a UUID.
///
/// Malformed ids are answered with 404 rather than 400: an id that cannot
/// exist is reported the same way as one that does not.
///
/// ```ignore
/// async fn get_review(UuidPath(id): UuidPath) -> Result<Json<Review>, AppError> { ... }
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;

        Uuid::parse_str(raw.trim())
            .map(UuidPath)
            .map_err(|_| AppError::NotFound(format!("No record with id {raw}")))
    }
}
