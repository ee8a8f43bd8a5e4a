use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use database::{DailyCount, PageRequest, PageResult, PagedQuery, stats};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value,
};
use uuid::Uuid;

use crate::error::CommentResult;
use crate::models::{Comment, RecentComment, UserComment};
use crate::repository::CommentRepository;

/// Requires the `users` table.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS comments (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    article_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_comments_article_id ON comments (article_id, created_at);
CREATE INDEX IF NOT EXISTS idx_comments_user_id ON comments (user_id, created_at);
"#;

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    id: Uuid,
    user_id: Uuid,
    username: String,
    article_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            article_id: row.article_id,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct RecentRow {
    content: String,
    username: String,
    news_title: Option<String>,
    article_id: String,
}

#[derive(Debug, FromQueryResult)]
struct HistoryRow {
    id: Uuid,
    article_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: i64,
}

fn stmt(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

#[derive(Clone)]
pub struct PgCommentRepository {
    db: DatabaseConnection,
}

impl PgCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn list_for_article(&self, article_id: &str) -> CommentResult<Vec<Comment>> {
        let rows = CommentRow::find_by_statement(stmt(
            "SELECT c.id, c.user_id, u.username, c.article_id, c.content, c.created_at \
             FROM comments c JOIN users u ON u.id = c.user_id \
             WHERE c.article_id = $1 \
             ORDER BY c.created_at DESC, c.id DESC",
            vec![article_id.into()],
        ))
        .all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn recent(&self, limit: u64) -> CommentResult<Vec<RecentComment>> {
        let rows = RecentRow::find_by_statement(stmt(
            "SELECT c.content, u.username, n.title AS news_title, c.article_id \
             FROM comments c \
             JOIN users u ON u.id = c.user_id \
             LEFT JOIN news n ON n.id = c.article_id \
             ORDER BY c.created_at DESC, c.id DESC LIMIT $1",
            vec![(limit as i64).into()],
        ))
        .all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RecentComment {
                content: row.content,
                username: row.username,
                news_title: row.news_title,
                article_id: row.article_id,
            })
            .collect())
    }

    async fn create(&self, comment: Comment) -> CommentResult<Comment> {
        self.db
            .execute_raw(stmt(
                "INSERT INTO comments (id, user_id, article_id, content, created_at) \
                 VALUES ($1, $2, $3, $4, $5)",
                vec![
                    comment.id.into(),
                    comment.user_id.into(),
                    comment.article_id.clone().into(),
                    comment.content.clone().into(),
                    comment.created_at.into(),
                ],
            ))
            .await?;

        tracing::info!(
            comment_id = %comment.id,
            article_id = %comment.article_id,
            "Created comment"
        );
        Ok(comment)
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> CommentResult<bool> {
        let result = self
            .db
            .execute_raw(stmt(
                "DELETE FROM comments WHERE id = $1 AND user_id = $2",
                vec![id.into(), user_id.into()],
            ))
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(comment_id = %id, "Deleted comment");
        }
        Ok(deleted)
    }

    async fn count_by_user(&self, user_id: Uuid) -> CommentResult<u64> {
        let row = TotalRow::find_by_statement(stmt(
            "SELECT COUNT(*) AS total FROM comments WHERE user_id = $1",
            vec![user_id.into()],
        ))
        .one(&self.db)
        .await?;

        Ok(row.map(|r| r.total.max(0) as u64).unwrap_or(0))
    }

    async fn by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> CommentResult<PageResult<UserComment>> {
        let rows = PagedQuery::new("id, article_id, content, created_at", "comments")
            .filter_eq("user_id", user_id)
            .order_by("created_at", "id")
            .fetch::<HistoryRow, _>(&self.db, &page)
            .await?;

        Ok(rows.map(|row| UserComment {
            id: row.id,
            article_id: row.article_id,
            content: row.content,
            activity_date: row.created_at,
        }))
    }

    async fn daily_counts(&self, _today: NaiveDate) -> CommentResult<Vec<DailyCount>> {
        Ok(stats::fetch_growth(&self.db, "comments", None).await?)
    }
}
