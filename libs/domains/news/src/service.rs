use chrono::Utc;
use database::{DailyCount, PageRequest, PageResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{NewsError, NewsResult};
use crate::models::{
    Article, ArticleForm, ArticleRef, ArticleSummary, CategoryCount, SyncArticle,
};
use crate::repository::NewsRepository;
use crate::storage::PhotoStore;

pub const DISTRIBUTION_LIMIT: u64 = 5;

pub struct NewsService<R: NewsRepository> {
    repository: Arc<R>,
    photos: PhotoStore,
}

impl<R: NewsRepository> Clone for NewsService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            photos: self.photos.clone(),
        }
    }
}

impl<R: NewsRepository> NewsService<R> {
    pub fn new(repository: R, photos: PhotoStore) -> Self {
        Self {
            repository: Arc::new(repository),
            photos,
        }
    }

    pub async fn list_all(&self) -> NewsResult<Vec<Article>> {
        self.repository.list_all().await
    }

    pub async fn by_category(&self, category: &str) -> NewsResult<Vec<Article>> {
        let articles = self.repository.by_category(category).await?;
        if articles.is_empty() {
            return Err(NewsError::EmptyCategory);
        }
        Ok(articles)
    }

    pub async fn search(&self, title: Option<&str>) -> NewsResult<Vec<Article>> {
        let term = title.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
            NewsError::Validation("Search query must not be empty".to_string())
        })?;
        self.repository.search_title(term).await
    }

    pub async fn list_page(
        &self,
        page: PageRequest,
        category: Option<String>,
    ) -> NewsResult<PageResult<ArticleSummary>> {
        let category = category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        self.repository.list_page(page, category).await
    }

    pub async fn get(&self, id: &str) -> NewsResult<Article> {
        self.repository.get(id).await?.ok_or(NewsError::NotFound)
    }

    /// Every text field and a photo are required. Returns the new id.
    pub async fn create(&self, form: ArticleForm) -> NewsResult<String> {
        let (Some(fields), Some(photo)) = (form.fields(), form.photo.as_ref()) else {
            return Err(NewsError::Validation(
                "All fields and a photo are required".to_string(),
            ));
        };

        let photo_url = self
            .photos
            .save(photo.file_name.as_deref(), &photo.bytes)
            .await?;

        let article = Article {
            id: Uuid::now_v7().to_string(),
            title: fields.title,
            description: Some(fields.description),
            category: fields.category,
            created_by: fields.created_by,
            photo_url: Some(photo_url.clone()),
            created_at: Utc::now(),
        };

        match self.repository.create(article).await {
            Ok(article) => Ok(article.id),
            Err(e) => {
                self.photos.remove(&photo_url).await;
                Err(e)
            }
        }
    }

    /// Keeps the stored photo when the form carries none. A replaced photo
    /// is deleted once the row points at the new one; a new photo is deleted
    /// again when the row could not be updated.
    pub async fn update(&self, id: &str, form: ArticleForm) -> NewsResult<()> {
        let fields = form
            .fields()
            .ok_or_else(|| NewsError::Validation("All fields are required".to_string()))?;
        let existing = self.get(id).await?;

        let new_photo = match &form.photo {
            Some(photo) => Some(
                self.photos
                    .save(photo.file_name.as_deref(), &photo.bytes)
                    .await?,
            ),
            None => None,
        };
        let photo_url = new_photo.clone().or_else(|| existing.photo_url.clone());

        let result = match self.repository.update(id, fields, photo_url).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(NewsError::NotFound),
            Err(e) => Err(e),
        };

        match (&result, new_photo, existing.photo_url) {
            (Ok(()), Some(_), Some(replaced)) => self.photos.remove(&replaced).await,
            (Err(_), Some(new_url), _) => self.photos.remove(&new_url).await,
            _ => {}
        }
        result
    }

    /// First write wins; a known URL is left untouched.
    pub async fn sync_external(&self, input: SyncArticle) -> NewsResult<String> {
        if input.url.trim().is_empty() || input.title.trim().is_empty() {
            return Err(NewsError::Validation("URL and title are required".to_string()));
        }

        let article = input.into_article();
        let id = article.id.clone();
        let inserted = self.repository.insert_if_absent(article).await?;
        tracing::debug!(article_id = %id, inserted, "Synced external article");
        Ok(id)
    }

    pub async fn delete(&self, id: &str) -> NewsResult<()> {
        if !self.repository.delete(id).await? {
            return Err(NewsError::NotFound);
        }
        Ok(())
    }

    pub async fn category_distribution(&self) -> NewsResult<Vec<CategoryCount>> {
        self.repository.category_distribution(DISTRIBUTION_LIMIT).await
    }

    pub async fn refs(&self, ids: Vec<String>) -> NewsResult<Vec<ArticleRef>> {
        self.repository.refs_by_ids(ids).await
    }

    pub async fn growth(&self) -> NewsResult<Vec<DailyCount>> {
        self.repository.daily_counts(Utc::now().date_naive()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhotoUpload;
    use crate::repository::{InMemoryNewsRepository, MockNewsRepository};
    use crate::storage::UploadConfig;
    use axum::body::Bytes;
    use sea_orm::DbErr;

    fn store() -> PhotoStore {
        PhotoStore::new(&UploadConfig {
            dir: std::env::temp_dir().join(format!("news-service-{}", Uuid::new_v4())),
        })
    }

    fn form(photo: bool) -> ArticleForm {
        ArticleForm {
            title: Some("Rust 2024".into()),
            description: Some("Edition released".into()),
            category: Some("Tech".into()),
            created_by: Some("root".into()),
            photo: photo.then(|| PhotoUpload {
                file_name: Some("cover.jpg".into()),
                bytes: Bytes::from_static(b"jpeg"),
            }),
        }
    }

    fn stored_article() -> Article {
        Article {
            id: "a1".into(),
            title: "Rust 2024".into(),
            description: None,
            category: "Tech".into(),
            created_by: "root".into(),
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_requires_photo() {
        let service = NewsService::new(InMemoryNewsRepository::new(), store());
        assert!(matches!(
            service.create(form(false)).await,
            Err(NewsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_then_update_keeps_photo() {
        let photos = store();
        let service = NewsService::new(InMemoryNewsRepository::new(), photos.clone());

        let id = service.create(form(true)).await.unwrap();
        let created = service.get(&id).await.unwrap();
        let photo_url = created.photo_url.clone().unwrap();
        assert!(photo_url.starts_with("/uploads/") && photo_url.ends_with(".jpg"));

        let mut changes = form(false);
        changes.title = Some("Rust 2024 is out".into());
        service.update(&id, changes).await.unwrap();

        let updated = service.get(&id).await.unwrap();
        assert_eq!(updated.title, "Rust 2024 is out");
        assert_eq!(updated.photo_url.as_deref(), Some(photo_url.as_str()));

        tokio::fs::remove_dir_all(photos.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let service = NewsService::new(InMemoryNewsRepository::new(), store());
        assert!(matches!(
            service.update("nope", form(false)).await,
            Err(NewsError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_photo() {
        let photos = store();
        let mut mock_repo = MockNewsRepository::new();
        mock_repo
            .expect_create()
            .returning(|_| Err(NewsError::Database(DbErr::Custom("insert failed".into()))));

        let service = NewsService::new(mock_repo, photos.clone());
        assert!(service.create(form(true)).await.is_err());

        let mut entries = tokio::fs::read_dir(photos.dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
        tokio::fs::remove_dir_all(photos.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_replacing_photo_removes_old_file() {
        let photos = store();
        let service = NewsService::new(InMemoryNewsRepository::new(), photos.clone());

        let id = service.create(form(true)).await.unwrap();
        let old_url = service.get(&id).await.unwrap().photo_url.unwrap();

        service.update(&id, form(true)).await.unwrap();
        let new_url = service.get(&id).await.unwrap().photo_url.unwrap();

        assert_ne!(old_url, new_url);
        let on_disk = |url: &str| {
            photos
                .dir()
                .join(url.trim_start_matches("/uploads/"))
                .exists()
        };
        assert!(!on_disk(&old_url));
        assert!(on_disk(&new_url));

        tokio::fs::remove_dir_all(photos.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_update_removes_new_photo() {
        let photos = store();
        let existing = stored_article();

        let mut mock_repo = MockNewsRepository::new();
        mock_repo
            .expect_get()
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo
            .expect_update()
            .returning(|_, _, _| Err(NewsError::Database(DbErr::Custom("update failed".into()))));

        let service = NewsService::new(mock_repo, photos.clone());
        assert!(service.update("a1", form(true)).await.is_err());

        let mut entries = tokio::fs::read_dir(photos.dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
        tokio::fs::remove_dir_all(photos.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_of_vanished_article_removes_new_photo() {
        let photos = store();
        let existing = stored_article();

        let mut mock_repo = MockNewsRepository::new();
        mock_repo
            .expect_get()
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_update().returning(|_, _, _| Ok(false));

        let service = NewsService::new(mock_repo, photos.clone());
        assert!(matches!(
            service.update("a1", form(true)).await,
            Err(NewsError::NotFound)
        ));

        let mut entries = tokio::fs::read_dir(photos.dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
        tokio::fs::remove_dir_all(photos.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_and_category_edge_cases() {
        let service = NewsService::new(InMemoryNewsRepository::new(), store());

        assert!(matches!(service.search(None).await, Err(NewsError::Validation(_))));
        assert!(matches!(service.search(Some("  ")).await, Err(NewsError::Validation(_))));
        assert!(matches!(
            service.by_category("Nothing").await,
            Err(NewsError::EmptyCategory)
        ));
    }

    #[tokio::test]
    async fn test_sync_first_write_wins() {
        let service = NewsService::new(InMemoryNewsRepository::new(), store());
        let sync = |title: &str| SyncArticle {
            url: "https://example.com/story".into(),
            title: title.into(),
            description: None,
            url_to_image: None,
            published_at: None,
            category: None,
        };

        let id = service.sync_external(sync("Original")).await.unwrap();
        service.sync_external(sync("Changed")).await.unwrap();

        assert_eq!(service.get(&id).await.unwrap().title, "Original");
    }
}
