use async_trait::async_trait;
use database::{PageRequest, PageResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{NewReview, Review, UNKNOWN_USER};
use crate::repository::ReviewRepository;

/// Resolves a submitter's current username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitterDirectory: Send + Sync {
    /// `None` when the identity no longer exists.
    async fn username(&self, user_id: Uuid) -> ReviewResult<Option<String>>;
}

pub struct ReviewService<R: ReviewRepository, D: SubmitterDirectory> {
    repository: Arc<R>,
    directory: Arc<D>,
}

impl<R: ReviewRepository, D: SubmitterDirectory> Clone for ReviewService<R, D> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<R: ReviewRepository, D: SubmitterDirectory> ReviewService<R, D> {
    pub fn new(repository: R, directory: D) -> Self {
        Self {
            repository: Arc::new(repository),
            directory: Arc::new(directory),
        }
    }

    pub async fn list(&self, page: PageRequest) -> ReviewResult<PageResult<Review>> {
        self.repository.list(page).await
    }

    pub async fn get(&self, id: Uuid) -> ReviewResult<Review> {
        self.repository.get(id).await?.ok_or(ReviewError::NotFound)
    }

    /// Returns the new review's id.
    pub async fn submit(&self, user_id: Uuid, input: NewReview) -> ReviewResult<Uuid> {
        if input.subject.trim().is_empty() || input.message.trim().is_empty() {
            return Err(ReviewError::Validation(
                "Email, subject and message are required".to_string(),
            ));
        }

        let username = self
            .directory
            .username(user_id)
            .await?
            .unwrap_or_else(|| UNKNOWN_USER.to_string());

        let review = input.into_review(user_id, username);
        Ok(self.repository.create(review).await?.id)
    }

    pub async fn delete(&self, id: Uuid) -> ReviewResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ReviewError::NotFound);
        }
        Ok(())
    }
}
