use async_trait::async_trait;
use chrono::NaiveDate;
use database::{DailyCount, PageRequest, PageResult, stats::daily_counts};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CommentResult;
use crate::models::{Comment, RecentComment, UserComment};

/// Repository trait for Comment persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on one article, newest first
    async fn list_for_article(&self, article_id: &str) -> CommentResult<Vec<Comment>>;

    async fn recent(&self, limit: u64) -> CommentResult<Vec<RecentComment>>;

    async fn create(&self, comment: Comment) -> CommentResult<Comment>;

    /// Deletes only when `user_id` wrote the comment. Returns `false`
    /// otherwise, including when the comment does not exist.
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> CommentResult<bool>;

    async fn count_by_user(&self, user_id: Uuid) -> CommentResult<u64>;

    /// A user's comment history, sorted by creation time
    async fn by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> CommentResult<PageResult<UserComment>>;

    async fn daily_counts(&self, today: NaiveDate) -> CommentResult<Vec<DailyCount>>;
}

/// Keeps the author's username as given at creation; article titles are
/// unknown here, so [`RecentComment::news_title`] is always `None`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCommentRepository {
    comments: Arc<RwLock<HashMap<Uuid, Comment>>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first(&self, keep: impl Fn(&Comment) -> bool) -> Vec<Comment> {
        let comments = self.comments.read().await;
        let mut matching: Vec<Comment> = comments.values().filter(|c| keep(c)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_article(&self, article_id: &str) -> CommentResult<Vec<Comment>> {
        Ok(self.newest_first(|c| c.article_id == article_id).await)
    }

    async fn recent(&self, limit: u64) -> CommentResult<Vec<RecentComment>> {
        Ok(self
            .newest_first(|_| true)
            .await
            .into_iter()
            .take(limit as usize)
            .map(|c| RecentComment {
                content: c.content,
                username: c.username,
                news_title: None,
                article_id: c.article_id,
            })
            .collect())
    }

    async fn create(&self, comment: Comment) -> CommentResult<Comment> {
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        tracing::info!(
            comment_id = %comment.id,
            article_id = %comment.article_id,
            "Created comment"
        );
        Ok(comment)
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> CommentResult<bool> {
        let mut comments = self.comments.write().await;
        if !comments.get(&id).is_some_and(|c| c.user_id == user_id) {
            return Ok(false);
        }

        comments.remove(&id);
        tracing::info!(comment_id = %id, "Deleted comment");
        Ok(true)
    }

    async fn count_by_user(&self, user_id: Uuid) -> CommentResult<u64> {
        let comments = self.comments.read().await;
        Ok(comments.values().filter(|c| c.user_id == user_id).count() as u64)
    }

    async fn by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> CommentResult<PageResult<UserComment>> {
        let comments = self.comments.read().await;
        let mut history: Vec<UserComment> = comments
            .values()
            .filter(|c| c.user_id == user_id)
            .map(UserComment::from)
            .collect();

        history.sort_by(|a, b| {
            page.sort_order
                .apply(a.activity_date.cmp(&b.activity_date).then(a.id.cmp(&b.id)))
        });
        Ok(PageResult::from_sorted(history, &page))
    }

    async fn daily_counts(&self, today: NaiveDate) -> CommentResult<Vec<DailyCount>> {
        let comments = self.comments.read().await;
        Ok(daily_counts(comments.values().map(|c| c.created_at), today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn comment(user_id: Uuid, article_id: &str, minutes_ago: i64) -> Comment {
        let mut comment = Comment::new(user_id, "alice1", article_id, "content");
        comment.created_at = Utc::now() - Duration::minutes(minutes_ago);
        comment
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let repo = InMemoryCommentRepository::new();
        let author = Uuid::now_v7();
        let other = Uuid::now_v7();
        let created = repo.create(comment(author, "a", 0)).await.unwrap();

        assert!(!repo.delete_owned(created.id, other).await.unwrap());
        assert!(!repo.delete_owned(Uuid::now_v7(), author).await.unwrap());
        assert!(repo.delete_owned(created.id, author).await.unwrap());
        assert!(repo.list_for_article("a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_orders_and_limits() {
        let repo = InMemoryCommentRepository::new();
        let user = Uuid::now_v7();
        let old = repo.create(comment(user, "a", 30)).await.unwrap();
        let new = repo.create(comment(user, "a", 5)).await.unwrap();
        repo.create(comment(user, "b", 10)).await.unwrap();

        let on_a = repo.list_for_article("a").await.unwrap();
        assert_eq!(on_a.iter().map(|c| c.id).collect::<Vec<_>>(), [new.id, old.id]);

        let recent = repo.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].article_id, "a");
        assert_eq!(recent[1].article_id, "b");
    }

    #[tokio::test]
    async fn test_user_history_pages() {
        let repo = InMemoryCommentRepository::new();
        let user = Uuid::now_v7();
        for minutes_ago in [1, 2, 3] {
            repo.create(comment(user, "a", minutes_ago)).await.unwrap();
        }
        repo.create(comment(Uuid::now_v7(), "a", 0)).await.unwrap();

        assert_eq!(repo.count_by_user(user).await.unwrap(), 3);

        let page = repo.by_user(user, PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
    }
}
