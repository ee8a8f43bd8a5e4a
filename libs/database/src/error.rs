use sea_orm::{DbErr, SqlErr};

/// Errors raised by the connector and health helpers.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] DbErr),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Schema bootstrap failed: {0}")]
    SchemaError(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// True when the driver reports a UNIQUE / primary key violation.
///
/// This is the only database failure repositories translate into a domain
/// error (a conflict); everything else surfaces as an internal error.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
