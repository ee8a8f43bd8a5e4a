pub mod handlers;

use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// { "message": "Username already taken" }
/// { "message": "Request validation failed", "details": { "username": [...] } }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }
}

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application error type that can be converted to HTTP responses.
///
/// Domain error enums convert into this type; only their client-facing
/// message crosses the boundary. Server-side failures are logged here and
/// replaced by a generic message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Path extraction error: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Multipart error: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too Many Requests: {0}")]
    TooManyRequests(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::ValidationError(_)
            | AppError::JsonExtractorRejection(_)
            | AppError::QueryRejection(_)
            | AppError::PathRejection(_) => StatusCode::BAD_REQUEST,
            // 413 past the body limit, 400 for malformed forms
            AppError::MultipartRejection(e) => e.status(),
            AppError::Multipart(e) => e.status(),
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalServerError(_) | AppError::Database(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::ValidationError(e) => {
                tracing::info!(error = ?e, "Validation error");
                ErrorResponse {
                    message: "Request validation failed".to_string(),
                    details: serde_json::to_value(&e).ok(),
                }
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(error = %e, "Invalid JSON body");
                ErrorResponse::new(e.body_text())
            }
            AppError::QueryRejection(e) => {
                tracing::info!(error = %e, "Invalid query string");
                ErrorResponse::new(e.body_text())
            }
            AppError::PathRejection(e) => {
                tracing::info!(error = %e, "Invalid path parameter");
                ErrorResponse::new(e.body_text())
            }
            AppError::MultipartRejection(e) => {
                tracing::info!(error = %e, "Invalid multipart request");
                ErrorResponse::new(e.body_text())
            }
            AppError::Multipart(e) => {
                tracing::info!(error = %e, "Malformed multipart body");
                ErrorResponse::new(e.body_text())
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::Unauthorized(msg) => {
                tracing::debug!("Unauthorized: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::Forbidden(msg) => {
                tracing::debug!("Forbidden: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!("Not found: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::TooManyRequests(msg) => {
                tracing::warn!("Too many requests: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                ErrorResponse::new(INTERNAL_MESSAGE)
            }
            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                ErrorResponse::new(INTERNAL_MESSAGE)
            }
            AppError::Io(e) => {
                tracing::error!(error = ?e, "I/O error");
                ErrorResponse::new(INTERNAL_MESSAGE)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                ErrorResponse::new(msg)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors_keep_their_message() {
        let (status, body) = body_of(AppError::Conflict("Username already taken".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, serde_json::json!({ "message": "Username already taken" }));

        let (status, _) = body_of(AppError::TooManyRequests("slow down".into())).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let (status, body) = body_of(AppError::Database(DbErr::Custom(
            "relation \"users\" does not exist".into(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], INTERNAL_MESSAGE);
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_validation_errors_carry_details() {
        let mut errors = ValidationErrors::new();
        errors.add("username", validator::ValidationError::new("length"));

        let (status, body) = body_of(AppError::ValidationError(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Request validation failed");
        assert!(body["details"]["username"].is_array());
    }
}
