use async_trait::async_trait;
use database::{PageRequest, PageResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ReviewResult;
use crate::models::Review;

/// Repository trait for Review persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Search matches subject or message.
    async fn list(&self, page: PageRequest) -> ReviewResult<PageResult<Review>>;

    async fn get(&self, id: Uuid) -> ReviewResult<Option<Review>>;

    async fn create(&self, review: Review) -> ReviewResult<Review>;

    async fn delete(&self, id: Uuid) -> ReviewResult<bool>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<Uuid, Review>>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn list(&self, page: PageRequest) -> ReviewResult<PageResult<Review>> {
        let reviews = self.reviews.read().await;
        let mut matching: Vec<Review> = reviews
            .values()
            .filter(|r| page.matches_search(&[&r.subject, &r.message]))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            page.sort_order
                .apply(a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        });
        Ok(PageResult::from_sorted(matching, &page))
    }

    async fn get(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        Ok(self.reviews.read().await.get(&id).cloned())
    }

    async fn create(&self, review: Review) -> ReviewResult<Review> {
        self.reviews.write().await.insert(review.id, review.clone());
        tracing::info!(review_id = %review.id, user_id = %review.user_id, "Created review");
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> ReviewResult<bool> {
        let removed = self.reviews.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(review_id = %id, "Deleted review");
        }
        Ok(removed)
    }
}
