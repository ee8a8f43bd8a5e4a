use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::{PageRequest, PageResult, PagedQuery};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value,
};
use uuid::Uuid;

use crate::error::ReviewResult;
use crate::models::Review;
use crate::repository::ReviewRepository;

/// `user_id` carries no foreign key: reviews outlive their submitters.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    username VARCHAR(50) NOT NULL,
    email VARCHAR(255) NOT NULL,
    subject TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_reviews_created_at ON reviews (created_at);
"#;

const COLUMNS: &str = "id, user_id, username, email, subject, message, created_at";

#[derive(Debug, FromQueryResult)]
struct ReviewRow {
    id: Uuid,
    user_id: Uuid,
    username: String,
    email: String,
    subject: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            subject: row.subject,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

fn stmt(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

#[derive(Clone)]
pub struct PgReviewRepository {
    db: DatabaseConnection,
}

impl PgReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn list(&self, page: PageRequest) -> ReviewResult<PageResult<Review>> {
        let rows = PagedQuery::new(COLUMNS, "reviews")
            .search(&["subject", "message"], page.search_term())
            .order_by("created_at", "id")
            .fetch::<ReviewRow, _>(&self.db, &page)
            .await?;

        Ok(rows.map(Review::from))
    }

    async fn get(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        let row = ReviewRow::find_by_statement(stmt(
            &format!("SELECT {COLUMNS} FROM reviews WHERE id = $1"),
            vec![id.into()],
        ))
        .one(&self.db)
        .await?;

        Ok(row.map(Review::from))
    }

    async fn create(&self, review: Review) -> ReviewResult<Review> {
        self.db
            .execute_raw(stmt(
                &format!("INSERT INTO reviews ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"),
                vec![
                    review.id.into(),
                    review.user_id.into(),
                    review.username.clone().into(),
                    review.email.clone().into(),
                    review.subject.clone().into(),
                    review.message.clone().into(),
                    review.created_at.into(),
                ],
            ))
            .await?;

        tracing::info!(review_id = %review.id, user_id = %review.user_id, "Created review");
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> ReviewResult<bool> {
        let result = self
            .db
            .execute_raw(stmt("DELETE FROM reviews WHERE id = $1", vec![id.into()]))
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(review_id = %id, "Deleted review");
        }
        Ok(deleted)
    }
}
