use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Comment not found or you are not allowed to delete it.")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type CommentResult<T> = Result<T, CommentError>;

impl From<CommentError> for AppError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::NotFound => AppError::NotFound(err.to_string()),
            CommentError::Validation(msg) => AppError::BadRequest(msg),
            CommentError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for CommentError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
