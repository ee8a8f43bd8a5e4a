use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use database::{DailyCount, PageRequest, PageResult, PagedQuery, stats};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value,
};

use crate::error::NewsResult;
use crate::models::{Article, ArticleFields, ArticleRef, ArticleSummary, CategoryCount};
use crate::repository::NewsRepository;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS news (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    category VARCHAR(100) NOT NULL DEFAULT '',
    created_by VARCHAR(100) NOT NULL,
    photo_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_news_created_at ON news (created_at);
CREATE INDEX IF NOT EXISTS idx_news_category_lower ON news (LOWER(category));
"#;

const COLUMNS: &str = "id, title, description, category, created_by, photo_url, created_at";

#[derive(Debug, FromQueryResult)]
struct ArticleRow {
    id: String,
    title: String,
    description: Option<String>,
    category: String,
    created_by: String,
    photo_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            created_by: row.created_by,
            photo_url: row.photo_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    id: String,
    title: String,
    category: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromQueryResult)]
struct RefRow {
    id: String,
    title: String,
    photo_url: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    category: String,
    count: i64,
}

fn stmt(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

fn insert_values(article: &Article) -> Vec<Value> {
    vec![
        article.id.clone().into(),
        article.title.clone().into(),
        article.description.clone().into(),
        article.category.clone().into(),
        article.created_by.clone().into(),
        article.photo_url.clone().into(),
        article.created_at.into(),
    ]
}

#[derive(Clone)]
pub struct PgNewsRepository {
    db: DatabaseConnection,
}

impl PgNewsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn articles(&self, sql: &str, values: Vec<Value>) -> NewsResult<Vec<Article>> {
        let rows = ArticleRow::find_by_statement(stmt(sql, values))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Article::from).collect())
    }
}

#[async_trait]
impl NewsRepository for PgNewsRepository {
    async fn list_all(&self) -> NewsResult<Vec<Article>> {
        self.articles(
            &format!("SELECT {COLUMNS} FROM news ORDER BY created_at DESC, id DESC"),
            vec![],
        )
        .await
    }

    async fn by_category(&self, category: &str) -> NewsResult<Vec<Article>> {
        self.articles(
            &format!(
                "SELECT {COLUMNS} FROM news WHERE LOWER(category) = LOWER($1) \
                 ORDER BY created_at DESC, id DESC"
            ),
            vec![category.into()],
        )
        .await
    }

    async fn search_title(&self, term: &str) -> NewsResult<Vec<Article>> {
        self.articles(
            &format!(
                "SELECT {COLUMNS} FROM news WHERE title ILIKE $1 ESCAPE '\\' \
                 ORDER BY created_at DESC, id DESC"
            ),
            vec![database::pagination::like_pattern(term).into()],
        )
        .await
    }

    async fn list_page(
        &self,
        page: PageRequest,
        category: Option<String>,
    ) -> NewsResult<PageResult<ArticleSummary>> {
        let mut query = PagedQuery::new("id, title, category, created_at", "news")
            .search(&["title"], page.search_term());
        if let Some(category) = category {
            query = query.filter_raw("LOWER(category) = LOWER(?)", vec![category.into()]);
        }

        let rows = query
            .order_by("created_at", "id")
            .fetch::<SummaryRow, _>(&self.db, &page)
            .await?;

        Ok(rows.map(|row| ArticleSummary {
            id: row.id,
            title: row.title,
            category: row.category,
            created_at: row.created_at,
        }))
    }

    async fn get(&self, id: &str) -> NewsResult<Option<Article>> {
        let row = ArticleRow::find_by_statement(stmt(
            &format!("SELECT {COLUMNS} FROM news WHERE id = $1"),
            vec![id.into()],
        ))
        .one(&self.db)
        .await?;
        Ok(row.map(Article::from))
    }

    async fn create(&self, article: Article) -> NewsResult<Article> {
        self.db
            .execute_raw(stmt(
                &format!("INSERT INTO news ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"),
                insert_values(&article),
            ))
            .await?;

        tracing::info!(article_id = %article.id, "Created article");
        Ok(article)
    }

    async fn insert_if_absent(&self, article: Article) -> NewsResult<bool> {
        let result = self
            .db
            .execute_raw(stmt(
                &format!(
                    "INSERT INTO news ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
                     ON CONFLICT (id) DO NOTHING"
                ),
                insert_values(&article),
            ))
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(
        &self,
        id: &str,
        fields: ArticleFields,
        photo_url: Option<String>,
    ) -> NewsResult<bool> {
        let result = self
            .db
            .execute_raw(stmt(
                "UPDATE news SET title = $1, description = $2, category = $3, \
                 created_by = $4, photo_url = $5 WHERE id = $6",
                vec![
                    fields.title.into(),
                    fields.description.into(),
                    fields.category.into(),
                    fields.created_by.into(),
                    photo_url.into(),
                    id.into(),
                ],
            ))
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> NewsResult<bool> {
        let result = self
            .db
            .execute_raw(stmt("DELETE FROM news WHERE id = $1", vec![id.into()]))
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(article_id = %id, "Deleted article");
        }
        Ok(deleted)
    }

    async fn category_distribution(&self, limit: u64) -> NewsResult<Vec<CategoryCount>> {
        let rows = CountRow::find_by_statement(stmt(
            "SELECT category, COUNT(*) AS count FROM news \
             WHERE category <> '' \
             GROUP BY category ORDER BY count DESC, category ASC LIMIT $1",
            vec![(limit as i64).into()],
        ))
        .all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryCount {
                category: row.category,
                count: row.count,
            })
            .collect())
    }

    async fn refs_by_ids(&self, ids: Vec<String>) -> NewsResult<Vec<ArticleRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=ids.len())
            .map(|n| format!("${n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let values = ids.into_iter().map(Value::from).collect();

        let rows = RefRow::find_by_statement(stmt(
            &format!("SELECT id, title, photo_url FROM news WHERE id IN ({placeholders})"),
            values,
        ))
        .all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ArticleRef {
                id: row.id,
                title: row.title,
                photo_url: row.photo_url,
            })
            .collect())
    }

    async fn daily_counts(&self, _today: NaiveDate) -> NewsResult<Vec<DailyCount>> {
        Ok(stats::fetch_growth(&self.db, "news", None).await?)
    }
}
