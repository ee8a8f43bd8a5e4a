use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, TokenError};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Username already taken")]
    UsernameTaken,

    /// Login with a wrong password.
    #[error("Invalid password")]
    InvalidCredentials,

    /// Password change with a wrong current password.
    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Unknown role stored for user: {0}")]
    CorruptRole(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::UsernameTaken => AppError::Conflict(err.to_string()),
            UserError::InvalidCredentials | UserError::WrongPassword => {
                AppError::Unauthorized(err.to_string())
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::PasswordHash(_) | UserError::CorruptRole(_) | UserError::Token(_) => {
                AppError::InternalServerError(err.to_string())
            }
            UserError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UserError::NotFound, StatusCode::NOT_FOUND),
            (UserError::UsernameTaken, StatusCode::CONFLICT),
            (UserError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (UserError::WrongPassword, StatusCode::UNAUTHORIZED),
            (UserError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                UserError::PasswordHash("salt".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                UserError::Database(DbErr::Custom("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
