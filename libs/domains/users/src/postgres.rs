//! PostgreSQL implementation of [`UserRepository`] over raw SeaORM statements.

use async_trait::async_trait;
use axum_helpers::Role;
use chrono::{DateTime, NaiveDate, Utc};
use database::{DailyCount, PageRequest, PageResult, PagedQuery, is_unique_violation, stats};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement,
};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

/// Created by `database::postgres::bootstrap_schema` at startup.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username VARCHAR(50) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role VARCHAR(10) NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_users_role_created_at ON users (role, created_at);
"#;

const COLUMNS: &str = "id, username, password_hash, role, created_at";

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|_| UserError::CorruptRole(row.role.clone()))?;

        Ok(User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

fn write_error(err: DbErr) -> UserError {
    if is_unique_violation(&err) {
        UserError::UsernameTaken
    } else {
        UserError::Database(err)
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn statement(sql: &str, values: Vec<sea_orm::Value>) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }

    async fn find_one(&self, stmt: Statement) -> UserResult<Option<User>> {
        UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        self.db
            .execute_raw(Self::statement(
                "INSERT INTO users (id, username, password_hash, role, created_at) \
                 VALUES ($1, $2, $3, $4, $5)",
                vec![
                    user.id.into(),
                    user.username.clone().into(),
                    user.password_hash.clone().into(),
                    user.role.as_str().into(),
                    user.created_at.into(),
                ],
            ))
            .await
            .map_err(write_error)?;

        tracing::info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        self.find_one(Self::statement(
            &format!("SELECT {COLUMNS} FROM users WHERE id = $1"),
            vec![id.into()],
        ))
        .await
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        self.find_one(Self::statement(
            &format!("SELECT {COLUMNS} FROM users WHERE username = $1"),
            vec![username.into()],
        ))
        .await
    }

    async fn update_username(&self, id: Uuid, username: &str) -> UserResult<bool> {
        let result = self
            .db
            .execute_raw(Self::statement(
                "UPDATE users SET username = $1 WHERE id = $2",
                vec![username.into(), id.into()],
            ))
            .await
            .map_err(write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> UserResult<bool> {
        let result = self
            .db
            .execute_raw(Self::statement(
                "UPDATE users SET password_hash = $1 WHERE id = $2",
                vec![password_hash.into(), id.into()],
            ))
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self, page: PageRequest) -> UserResult<PageResult<User>> {
        PagedQuery::new(COLUMNS, "users")
            .filter_eq("role", Role::User.as_str())
            .search(&["username"], page.search_term())
            .order_by("created_at", "id")
            .fetch::<UserRow, _>(&self.db, &page)
            .await?
            .try_map(User::try_from)
    }

    async fn recent_users(&self, limit: u64) -> UserResult<Vec<User>> {
        let rows = UserRow::find_by_statement(Self::statement(
            &format!(
                "SELECT {COLUMNS} FROM users WHERE role = 'user' \
                 ORDER BY created_at DESC, id DESC LIMIT $1"
            ),
            vec![(limit as i64).into()],
        ))
        .all(&self.db)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn delete_user(&self, id: Uuid) -> UserResult<bool> {
        let result = self
            .db
            .execute_raw(Self::statement(
                "DELETE FROM users WHERE id = $1 AND role = 'user'",
                vec![id.into()],
            ))
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }

    async fn daily_registrations(&self, _today: NaiveDate) -> UserResult<Vec<DailyCount>> {
        Ok(stats::fetch_growth(&self.db, "users", Some("role = 'user'")).await?)
    }
}
