use database::{PageRequest, PageResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LikeError, LikeResult};
use crate::models::{CastVote, LikedArticle, TopLiked, VoteSummary};
use crate::repository::LikeRepository;

pub const TOP_LIKED_LIMIT: u64 = 5;

fn required_article(id_news: Option<&str>) -> LikeResult<&str> {
    id_news
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| LikeError::Validation("id_news is required".to_string()))
}

pub struct LikeService<R: LikeRepository> {
    repository: Arc<R>,
}

impl<R: LikeRepository> Clone for LikeService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: LikeRepository> LikeService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn summary(&self, user_id: Uuid, id_news: Option<&str>) -> LikeResult<VoteSummary> {
        let article_id = required_article(id_news)?;
        self.repository.summary(user_id, article_id).await
    }

    /// Idempotent: repeating a vote leaves the counts unchanged.
    pub async fn vote(&self, user_id: Uuid, input: CastVote) -> LikeResult<()> {
        let article_id = required_article(Some(input.id_news.as_str()))?;
        self.repository.upsert(user_id, article_id, input.value).await
    }

    /// Removing a vote that does not exist is not an error.
    pub async fn unvote(&self, user_id: Uuid, id_news: &str) -> LikeResult<()> {
        let article_id = required_article(Some(id_news))?;
        let removed = self.repository.remove(user_id, article_id).await?;
        tracing::debug!(user_id = %user_id, article_id, removed, "Removed vote");
        Ok(())
    }

    pub async fn count_liked(&self, user_id: Uuid) -> LikeResult<u64> {
        self.repository.count_liked_by_user(user_id).await
    }

    pub async fn history(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> LikeResult<PageResult<LikedArticle>> {
        self.repository.liked_by_user(user_id, page).await
    }

    pub async fn top_liked(&self) -> LikeResult<Vec<TopLiked>> {
        self.repository.top_liked(TOP_LIKED_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryLikeRepository, MockLikeRepository};

    fn cast(id_news: &str, value: bool) -> CastVote {
        CastVote {
            id_news: id_news.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn test_repeated_vote_is_idempotent() {
        let service = LikeService::new(InMemoryLikeRepository::new());
        let user = Uuid::now_v7();

        service.vote(user, cast("a", true)).await.unwrap();
        let once = service.summary(user, Some("a")).await.unwrap();
        service.vote(user, cast("a", true)).await.unwrap();
        assert_eq!(service.summary(user, Some("a")).await.unwrap(), once);
        assert_eq!(once.like_count, 1);
    }

    #[tokio::test]
    async fn test_article_id_is_required() {
        let service = LikeService::new(InMemoryLikeRepository::new());
        let user = Uuid::now_v7();

        assert!(matches!(service.summary(user, None).await, Err(LikeError::Validation(_))));
        assert!(matches!(
            service.vote(user, cast("  ", true)).await,
            Err(LikeError::Validation(_))
        ));
        assert!(matches!(service.unvote(user, "").await, Err(LikeError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unvote_without_vote_is_ok() {
        let mut mock_repo = MockLikeRepository::new();
        mock_repo.expect_remove().times(1).returning(|_, _| Ok(false));

        let service = LikeService::new(mock_repo);
        service.unvote(Uuid::now_v7(), "a").await.unwrap();
    }

    #[tokio::test]
    async fn test_top_liked_uses_fixed_limit() {
        let mut mock_repo = MockLikeRepository::new();
        mock_repo
            .expect_top_liked()
            .withf(|limit| *limit == TOP_LIKED_LIMIT)
            .returning(|_| Ok(vec![]));

        let service = LikeService::new(mock_repo);
        assert!(service.top_liked().await.unwrap().is_empty());
    }
}
