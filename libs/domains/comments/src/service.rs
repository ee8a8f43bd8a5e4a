use axum_helpers::JwtClaims;
use chrono::Utc;
use database::{DailyCount, PageRequest, PageResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{CommentError, CommentResult};
use crate::models::{Comment, NewComment, RecentComment, UserComment};
use crate::repository::CommentRepository;

pub const RECENT_COMMENTS_LIMIT: u64 = 5;

pub struct CommentService<R: CommentRepository> {
    repository: Arc<R>,
}

impl<R: CommentRepository> Clone for CommentService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CommentRepository> CommentService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn for_article(&self, news_url: Option<&str>) -> CommentResult<Vec<Comment>> {
        let article_id = news_url
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CommentError::Validation("news_url is required".to_string()))?;
        self.repository.list_for_article(article_id).await
    }

    pub async fn recent(&self) -> CommentResult<Vec<RecentComment>> {
        self.repository.recent(RECENT_COMMENTS_LIMIT).await
    }

    /// Writes a comment as the caller. Returns the new id.
    pub async fn create(&self, author: &JwtClaims, input: NewComment) -> CommentResult<Uuid> {
        let content = input.content.trim();
        let article_id = input.news_url.trim();
        if content.is_empty() || article_id.is_empty() {
            return Err(CommentError::Validation(
                "Content and news_url are required".to_string(),
            ));
        }

        let comment = Comment::new(author.user_id(), &author.username, article_id, content);
        Ok(self.repository.create(comment).await?.id)
    }

    pub async fn delete(&self, id: Uuid, caller: Uuid) -> CommentResult<()> {
        if !self.repository.delete_owned(id, caller).await? {
            return Err(CommentError::NotFound);
        }
        Ok(())
    }

    pub async fn count_by_user(&self, user_id: Uuid) -> CommentResult<u64> {
        self.repository.count_by_user(user_id).await
    }

    pub async fn history(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> CommentResult<PageResult<UserComment>> {
        self.repository.by_user(user_id, page).await
    }

    pub async fn growth(&self) -> CommentResult<Vec<DailyCount>> {
        self.repository.daily_counts(Utc::now().date_naive()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCommentRepository, MockCommentRepository};
    use axum_helpers::Role;
    use sea_orm::DbErr;

    fn claims(username: &str) -> JwtClaims {
        JwtClaims {
            sub: Uuid::now_v7(),
            username: username.to_string(),
            role: Role::User,
            iat: 0,
            exp: 0,
        }
    }

    fn input(content: &str, news_url: &str) -> NewComment {
        NewComment {
            content: content.to_string(),
            news_url: news_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = CommentService::new(InMemoryCommentRepository::new());
        let alice = claims("alice1");

        let id = service
            .create(&alice, input("  Great piece  ", "article-1"))
            .await
            .unwrap();

        let comments = service.for_article(Some("article-1")).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, id);
        assert_eq!(comments[0].content, "Great piece");
        assert_eq!(comments[0].username, "alice1");
        assert_eq!(comments[0].user_id, alice.user_id());
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let service = CommentService::new(InMemoryCommentRepository::new());

        assert!(matches!(
            service.create(&claims("alice1"), input("   ", "article-1")).await,
            Err(CommentError::Validation(_))
        ));
        assert!(matches!(
            service.for_article(None).await,
            Err(CommentError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_non_author_delete_is_not_found() {
        let service = CommentService::new(InMemoryCommentRepository::new());
        let alice = claims("alice1");
        let id = service.create(&alice, input("Mine", "a")).await.unwrap();

        let intruder = claims("mallory");
        assert!(matches!(
            service.delete(id, intruder.user_id()).await,
            Err(CommentError::NotFound)
        ));
        service.delete(id, alice.user_id()).await.unwrap();
        assert!(matches!(
            service.delete(id, alice.user_id()).await,
            Err(CommentError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_recent_uses_fixed_limit() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo
            .expect_recent()
            .withf(|limit| *limit == RECENT_COMMENTS_LIMIT)
            .returning(|_| Ok(vec![]));

        let service = CommentService::new(mock_repo);
        assert!(service.recent().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_failure_propagates() {
        let mut mock_repo = MockCommentRepository::new();
        mock_repo
            .expect_count_by_user()
            .returning(|_| Err(CommentError::Database(DbErr::Custom("down".into()))));

        let service = CommentService::new(mock_repo);
        assert!(matches!(
            service.count_by_user(Uuid::now_v7()).await,
            Err(CommentError::Database(_))
        ));
    }
}
