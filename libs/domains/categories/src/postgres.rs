use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::is_unique_violation;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement, Value,
};
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::Category;
use crate::repository::CategoryRepository;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

fn stmt(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

fn write_error(err: DbErr) -> CategoryError {
    if is_unique_violation(&err) {
        CategoryError::Duplicate
    } else {
        CategoryError::Database(err)
    }
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let rows = CategoryRow::find_by_statement(stmt(
            "SELECT id, name, created_at FROM categories ORDER BY name ASC, id ASC",
            vec![],
        ))
        .all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn get_by_name(&self, name: &str) -> CategoryResult<Option<Category>> {
        let row = CategoryRow::find_by_statement(stmt(
            "SELECT id, name, created_at FROM categories WHERE name = $1",
            vec![name.into()],
        ))
        .one(&self.db)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn create(&self, category: Category) -> CategoryResult<Category> {
        self.db
            .execute_raw(stmt(
                "INSERT INTO categories (id, name, created_at) VALUES ($1, $2, $3)",
                vec![
                    category.id.into(),
                    category.name.clone().into(),
                    category.created_at.into(),
                ],
            ))
            .await
            .map_err(write_error)?;

        tracing::info!(category_id = %category.id, name = %category.name, "Created category");
        Ok(category)
    }

    async fn rename(&self, id: Uuid, name: &str) -> CategoryResult<bool> {
        let result = self
            .db
            .execute_raw(stmt(
                "UPDATE categories SET name = $1 WHERE id = $2",
                vec![name.into(), id.into()],
            ))
            .await
            .map_err(write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let result = self
            .db
            .execute_raw(stmt("DELETE FROM categories WHERE id = $1", vec![id.into()]))
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(deleted)
    }
}
