use async_trait::async_trait;
use chrono::NaiveDate;
use database::{DailyCount, PageRequest, PageResult, stats::daily_counts};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::NewsResult;
use crate::models::{Article, ArticleFields, ArticleRef, ArticleSummary, CategoryCount};

/// Repository trait for Article persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Every article, newest first
    async fn list_all(&self) -> NewsResult<Vec<Article>>;

    /// Case-insensitive category match, newest first
    async fn by_category(&self, category: &str) -> NewsResult<Vec<Article>>;

    /// Case-insensitive title substring match, newest first
    async fn search_title(&self, term: &str) -> NewsResult<Vec<Article>>;

    /// Admin listing; search matches title, `category` is a
    /// case-insensitive equality filter.
    async fn list_page(
        &self,
        page: PageRequest,
        category: Option<String>,
    ) -> NewsResult<PageResult<ArticleSummary>>;

    async fn get(&self, id: &str) -> NewsResult<Option<Article>>;

    async fn create(&self, article: Article) -> NewsResult<Article>;

    /// Inserts unless the id exists. Returns `true` when a row was written.
    async fn insert_if_absent(&self, article: Article) -> NewsResult<bool>;

    /// Returns `false` when no article has this id.
    async fn update(
        &self,
        id: &str,
        fields: ArticleFields,
        photo_url: Option<String>,
    ) -> NewsResult<bool>;

    async fn delete(&self, id: &str) -> NewsResult<bool>;

    /// Largest categories first, blank categories excluded
    async fn category_distribution(&self, limit: u64) -> NewsResult<Vec<CategoryCount>>;

    /// Articles among `ids`; unknown ids are skipped.
    async fn refs_by_ids(&self, ids: Vec<String>) -> NewsResult<Vec<ArticleRef>>;

    async fn daily_counts(&self, today: NaiveDate) -> NewsResult<Vec<DailyCount>>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryNewsRepository {
    articles: Arc<RwLock<HashMap<String, Article>>>,
}

impl InMemoryNewsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first(&self, keep: impl Fn(&Article) -> bool) -> Vec<Article> {
        let articles = self.articles.read().await;
        let mut matching: Vec<Article> = articles.values().filter(|a| keep(a)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching
    }
}

#[async_trait]
impl NewsRepository for InMemoryNewsRepository {
    async fn list_all(&self) -> NewsResult<Vec<Article>> {
        Ok(self.newest_first(|_| true).await)
    }

    async fn by_category(&self, category: &str) -> NewsResult<Vec<Article>> {
        Ok(self
            .newest_first(|a| a.category.eq_ignore_ascii_case(category))
            .await)
    }

    async fn search_title(&self, term: &str) -> NewsResult<Vec<Article>> {
        let needle = term.to_lowercase();
        Ok(self
            .newest_first(|a| a.title.to_lowercase().contains(&needle))
            .await)
    }

    async fn list_page(
        &self,
        page: PageRequest,
        category: Option<String>,
    ) -> NewsResult<PageResult<ArticleSummary>> {
        let articles = self.articles.read().await;
        let mut matching: Vec<ArticleSummary> = articles
            .values()
            .filter(|a| page.matches_search(&[&a.title]))
            .filter(|a| {
                category
                    .as_deref()
                    .is_none_or(|c| a.category.eq_ignore_ascii_case(c))
            })
            .map(ArticleSummary::from)
            .collect();

        matching.sort_by(|a, b| {
            page.sort_order
                .apply(a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        });
        Ok(PageResult::from_sorted(matching, &page))
    }

    async fn get(&self, id: &str) -> NewsResult<Option<Article>> {
        Ok(self.articles.read().await.get(id).cloned())
    }

    async fn create(&self, article: Article) -> NewsResult<Article> {
        self.articles
            .write()
            .await
            .insert(article.id.clone(), article.clone());
        tracing::info!(article_id = %article.id, "Created article");
        Ok(article)
    }

    async fn insert_if_absent(&self, article: Article) -> NewsResult<bool> {
        let mut articles = self.articles.write().await;
        if articles.contains_key(&article.id) {
            return Ok(false);
        }
        articles.insert(article.id.clone(), article);
        Ok(true)
    }

    async fn update(
        &self,
        id: &str,
        fields: ArticleFields,
        photo_url: Option<String>,
    ) -> NewsResult<bool> {
        let mut articles = self.articles.write().await;
        let Some(article) = articles.get_mut(id) else {
            return Ok(false);
        };

        article.title = fields.title;
        article.description = Some(fields.description);
        article.category = fields.category;
        article.created_by = fields.created_by;
        article.photo_url = photo_url;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> NewsResult<bool> {
        let removed = self.articles.write().await.remove(id).is_some();
        if removed {
            tracing::info!(article_id = %id, "Deleted article");
        }
        Ok(removed)
    }

    async fn category_distribution(&self, limit: u64) -> NewsResult<Vec<CategoryCount>> {
        let articles = self.articles.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for article in articles.values().filter(|a| !a.category.is_empty()) {
            *counts.entry(article.category.as_str()).or_default() += 1;
        }

        let mut distribution: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();
        distribution.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
        distribution.truncate(limit as usize);
        Ok(distribution)
    }

    async fn refs_by_ids(&self, ids: Vec<String>) -> NewsResult<Vec<ArticleRef>> {
        let articles = self.articles.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| articles.get(id))
            .map(|a| ArticleRef {
                id: a.id.clone(),
                title: a.title.clone(),
                photo_url: a.photo_url.clone(),
            })
            .collect())
    }

    async fn daily_counts(&self, today: NaiveDate) -> NewsResult<Vec<DailyCount>> {
        let articles = self.articles.read().await;
        Ok(daily_counts(articles.values().map(|a| a.created_at), today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn article(id: &str, title: &str, category: &str, minutes_ago: i64) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            category: category.to_string(),
            created_by: "root".to_string(),
            photo_url: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    async fn seeded() -> InMemoryNewsRepository {
        let repo = InMemoryNewsRepository::new();
        repo.create(article("a", "Rust 2024 released", "Tech", 30)).await.unwrap();
        repo.create(article("b", "Cup final", "Sports", 20)).await.unwrap();
        repo.create(article("c", "New rust compiler", "tech", 10)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_category_and_title_matching_ignore_case() {
        let repo = seeded().await;

        let tech = repo.by_category("TECH").await.unwrap();
        assert_eq!(tech.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), ["c", "a"]);

        let rust = repo.search_title("RUST").await.unwrap();
        assert_eq!(rust.len(), 2);
    }

    #[tokio::test]
    async fn test_list_page_filters_and_sorts() {
        let repo = seeded().await;

        let page = repo
            .list_page(PageRequest::new(1, 20), Some("Tech".into()))
            .await
            .unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items[0].id, "c");

        let oldest_first = repo
            .list_page(
                PageRequest::new(1, 1).with_sort_order(database::SortOrder::Asc),
                None,
            )
            .await
            .unwrap();
        assert_eq!(oldest_first.total_pages, 3);
        assert_eq!(oldest_first.items[0].id, "a");
    }

    #[tokio::test]
    async fn test_insert_if_absent_keeps_first_write() {
        let repo = InMemoryNewsRepository::new();
        assert!(repo.insert_if_absent(article("u", "First", "External", 0)).await.unwrap());
        assert!(!repo.insert_if_absent(article("u", "Second", "External", 0)).await.unwrap());
        assert_eq!(repo.get("u").await.unwrap().unwrap().title, "First");
    }

    #[tokio::test]
    async fn test_distribution_is_exact_category_counts() {
        let repo = seeded().await;
        repo.create(article("d", "Derby", "Sports", 5)).await.unwrap();
        repo.create(article("e", "Blank", "", 5)).await.unwrap();

        let distribution = repo.category_distribution(5).await.unwrap();
        assert_eq!(distribution[0], CategoryCount { category: "Sports".into(), count: 2 });
        assert_eq!(distribution.len(), 3);
    }
}
