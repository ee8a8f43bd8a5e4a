use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::{PageRequest, PageResult, PagedQuery};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value,
};
use uuid::Uuid;

use crate::error::LikeResult;
use crate::models::{LikedArticle, TopLiked, VoteSummary};
use crate::repository::LikeRepository;

/// Requires the `users` table.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS likes (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    article_id TEXT NOT NULL,
    value BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (user_id, article_id)
);
CREATE INDEX IF NOT EXISTS idx_likes_article_id ON likes (article_id);
"#;

#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    user_like_status: Option<bool>,
    like_count: i64,
    dislike_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct LikedRow {
    id: Uuid,
    article_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromQueryResult)]
struct TopRow {
    article_id: String,
    like_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: i64,
}

fn stmt(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

#[derive(Clone)]
pub struct PgLikeRepository {
    db: DatabaseConnection,
}

impl PgLikeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn upsert(&self, user_id: Uuid, article_id: &str, value: bool) -> LikeResult<()> {
        self.db
            .execute_raw(stmt(
                "INSERT INTO likes (id, user_id, article_id, value, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, NOW(), NOW()) \
                 ON CONFLICT (user_id, article_id) \
                 DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
                vec![
                    Uuid::now_v7().into(),
                    user_id.into(),
                    article_id.into(),
                    value.into(),
                ],
            ))
            .await?;

        tracing::debug!(user_id = %user_id, article_id, value, "Recorded vote");
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, article_id: &str) -> LikeResult<bool> {
        let result = self
            .db
            .execute_raw(stmt(
                "DELETE FROM likes WHERE user_id = $1 AND article_id = $2",
                vec![user_id.into(), article_id.into()],
            ))
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn summary(&self, user_id: Uuid, article_id: &str) -> LikeResult<VoteSummary> {
        let row = SummaryRow::find_by_statement(stmt(
            "SELECT \
                 (SELECT value FROM likes WHERE user_id = $1 AND article_id = $2) \
                     AS user_like_status, \
                 COUNT(*) FILTER (WHERE value) AS like_count, \
                 COUNT(*) FILTER (WHERE NOT value) AS dislike_count \
             FROM likes WHERE article_id = $2",
            vec![user_id.into(), article_id.into()],
        ))
        .one(&self.db)
        .await?;

        Ok(row
            .map(|row| VoteSummary {
                user_like_status: row.user_like_status,
                like_count: row.like_count,
                dislike_count: row.dislike_count,
            })
            .unwrap_or_default())
    }

    async fn count_liked_by_user(&self, user_id: Uuid) -> LikeResult<u64> {
        let row = TotalRow::find_by_statement(stmt(
            "SELECT COUNT(*) AS total FROM likes WHERE user_id = $1 AND value",
            vec![user_id.into()],
        ))
        .one(&self.db)
        .await?;

        Ok(row.map(|r| r.total.max(0) as u64).unwrap_or(0))
    }

    async fn liked_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> LikeResult<PageResult<LikedArticle>> {
        let rows = PagedQuery::new("id, article_id, created_at", "likes")
            .filter_eq("user_id", user_id)
            .filter_raw("value", vec![])
            .order_by("created_at", "id")
            .fetch::<LikedRow, _>(&self.db, &page)
            .await?;

        Ok(rows.map(|row| LikedArticle {
            id: row.id,
            article_id: row.article_id,
            activity_date: row.created_at,
        }))
    }

    async fn top_liked(&self, limit: u64) -> LikeResult<Vec<TopLiked>> {
        let rows = TopRow::find_by_statement(stmt(
            "SELECT article_id, COUNT(*) AS like_count FROM likes WHERE value \
             GROUP BY article_id ORDER BY like_count DESC, article_id ASC LIMIT $1",
            vec![(limit as i64).into()],
        ))
        .all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopLiked {
                article_id: row.article_id,
                like_count: row.like_count,
            })
            .collect())
    }
}
