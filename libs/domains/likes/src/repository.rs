use async_trait::async_trait;
use chrono::Utc;
use database::{PageRequest, PageResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::LikeResult;
use crate::models::{LikedArticle, TopLiked, Vote, VoteSummary};

/// Repository trait for Vote persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Inserts the vote or overwrites the value of the existing
    /// `(user_id, article_id)` vote.
    async fn upsert(&self, user_id: Uuid, article_id: &str, value: bool) -> LikeResult<()>;

    /// Returns `false` when the user had not voted.
    async fn remove(&self, user_id: Uuid, article_id: &str) -> LikeResult<bool>;

    async fn summary(&self, user_id: Uuid, article_id: &str) -> LikeResult<VoteSummary>;

    /// Likes only; dislikes are not counted.
    async fn count_liked_by_user(&self, user_id: Uuid) -> LikeResult<u64>;

    async fn liked_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> LikeResult<PageResult<LikedArticle>>;

    /// Articles with the most likes, ties broken by article id
    async fn top_liked(&self, limit: u64) -> LikeResult<Vec<TopLiked>>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryLikeRepository {
    votes: Arc<RwLock<HashMap<(Uuid, String), Vote>>>,
}

impl InMemoryLikeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LikeRepository for InMemoryLikeRepository {
    async fn upsert(&self, user_id: Uuid, article_id: &str, value: bool) -> LikeResult<()> {
        let mut votes = self.votes.write().await;
        votes
            .entry((user_id, article_id.to_string()))
            .and_modify(|vote| {
                vote.value = value;
                vote.updated_at = Utc::now();
            })
            .or_insert_with(|| Vote::new(user_id, article_id, value));
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, article_id: &str) -> LikeResult<bool> {
        let mut votes = self.votes.write().await;
        Ok(votes.remove(&(user_id, article_id.to_string())).is_some())
    }

    async fn summary(&self, user_id: Uuid, article_id: &str) -> LikeResult<VoteSummary> {
        let votes = self.votes.read().await;
        let mut summary = VoteSummary::default();

        for vote in votes.values().filter(|v| v.article_id == article_id) {
            if vote.value {
                summary.like_count += 1;
            } else {
                summary.dislike_count += 1;
            }
            if vote.user_id == user_id {
                summary.user_like_status = Some(vote.value);
            }
        }
        Ok(summary)
    }

    async fn count_liked_by_user(&self, user_id: Uuid) -> LikeResult<u64> {
        let votes = self.votes.read().await;
        Ok(votes
            .values()
            .filter(|v| v.user_id == user_id && v.value)
            .count() as u64)
    }

    async fn liked_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> LikeResult<PageResult<LikedArticle>> {
        let votes = self.votes.read().await;
        let mut liked: Vec<LikedArticle> = votes
            .values()
            .filter(|v| v.user_id == user_id && v.value)
            .map(|v| LikedArticle {
                id: v.id,
                article_id: v.article_id.clone(),
                activity_date: v.created_at,
            })
            .collect();

        liked.sort_by(|a, b| {
            page.sort_order
                .apply(a.activity_date.cmp(&b.activity_date).then(a.id.cmp(&b.id)))
        });
        Ok(PageResult::from_sorted(liked, &page))
    }

    async fn top_liked(&self, limit: u64) -> LikeResult<Vec<TopLiked>> {
        let votes = self.votes.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for vote in votes.values().filter(|v| v.value) {
            *counts.entry(vote.article_id.as_str()).or_default() += 1;
        }

        let mut top: Vec<TopLiked> = counts
            .into_iter()
            .map(|(article_id, like_count)| TopLiked {
                article_id: article_id.to_string(),
                like_count,
            })
            .collect();
        top.sort_by(|a, b| {
            b.like_count
                .cmp(&a.like_count)
                .then(a.article_id.cmp(&b.article_id))
        });
        top.truncate(limit as usize);
        Ok(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_value() {
        let repo = InMemoryLikeRepository::new();
        let user = Uuid::now_v7();

        repo.upsert(user, "a", true).await.unwrap();
        repo.upsert(user, "a", true).await.unwrap();
        assert_eq!(
            repo.summary(user, "a").await.unwrap(),
            VoteSummary { user_like_status: Some(true), like_count: 1, dislike_count: 0 }
        );

        repo.upsert(user, "a", false).await.unwrap();
        assert_eq!(
            repo.summary(user, "a").await.unwrap(),
            VoteSummary { user_like_status: Some(false), like_count: 0, dislike_count: 1 }
        );
    }

    #[tokio::test]
    async fn test_remove_and_status_for_others() {
        let repo = InMemoryLikeRepository::new();
        let (alice, bob) = (Uuid::now_v7(), Uuid::now_v7());
        repo.upsert(alice, "a", true).await.unwrap();

        let for_bob = repo.summary(bob, "a").await.unwrap();
        assert_eq!(for_bob.user_like_status, None);
        assert_eq!(for_bob.like_count, 1);

        assert!(!repo.remove(bob, "a").await.unwrap());
        assert!(repo.remove(alice, "a").await.unwrap());
        assert_eq!(repo.summary(alice, "a").await.unwrap(), VoteSummary::default());
    }

    #[tokio::test]
    async fn test_history_and_top_count_likes_only() {
        let repo = InMemoryLikeRepository::new();
        let (alice, bob) = (Uuid::now_v7(), Uuid::now_v7());
        repo.upsert(alice, "a", true).await.unwrap();
        repo.upsert(alice, "b", false).await.unwrap();
        repo.upsert(bob, "b", true).await.unwrap();
        repo.upsert(bob, "c", true).await.unwrap();

        assert_eq!(repo.count_liked_by_user(alice).await.unwrap(), 1);
        let history = repo.liked_by_user(alice, PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(history.total_items, 1);
        assert_eq!(history.items[0].article_id, "a");

        let top = repo.top_liked(2).await.unwrap();
        assert_eq!(
            top.iter().map(|t| t.article_id.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );
    }
}
