use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Submitter lookup failed: {0}")]
    Directory(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ReviewResult<T> = Result<T, ReviewError>;

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound => AppError::NotFound(err.to_string()),
            ReviewError::Validation(msg) => AppError::BadRequest(msg),
            ReviewError::Directory(_) => AppError::InternalServerError(err.to_string()),
            ReviewError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
