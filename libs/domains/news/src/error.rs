use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Article not found")]
    NotFound,

    #[error("No articles found in this category")]
    EmptyCategory,

    #[error("{0}")]
    Validation(String),

    #[error("Photo storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type NewsResult<T> = Result<T, NewsError>;

impl From<NewsError> for AppError {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::NotFound | NewsError::EmptyCategory => AppError::NotFound(err.to_string()),
            NewsError::Validation(msg) => AppError::BadRequest(msg),
            NewsError::Storage(e) => AppError::Io(e),
            NewsError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for NewsError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
