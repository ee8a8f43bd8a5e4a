use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LikeError {
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type LikeResult<T> = Result<T, LikeError>;

impl From<LikeError> for AppError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::Validation(msg) => AppError::BadRequest(msg),
            LikeError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for LikeError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
