use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::Category;

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name ascending
    async fn list(&self) -> CategoryResult<Vec<Category>>;

    async fn get_by_name(&self, name: &str) -> CategoryResult<Option<Category>>;

    /// Fails with `Duplicate` when the name exists.
    async fn create(&self, category: Category) -> CategoryResult<Category>;

    /// Returns `false` when no category has this id.
    async fn rename(&self, id: Uuid, name: &str) -> CategoryResult<bool>;

    async fn delete(&self, id: Uuid) -> CategoryResult<bool>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let mut all: Vec<Category> = self.categories.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get_by_name(&self, name: &str) -> CategoryResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.values().find(|c| c.name == name).cloned())
    }

    async fn create(&self, category: Category) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.name == category.name) {
            return Err(CategoryError::Duplicate);
        }

        categories.insert(category.id, category.clone());
        tracing::info!(category_id = %category.id, name = %category.name, "Created category");
        Ok(category)
    }

    async fn rename(&self, id: Uuid, name: &str) -> CategoryResult<bool> {
        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.name == name && c.id != id) {
            return Err(CategoryError::Duplicate);
        }

        Ok(categories
            .get_mut(&id)
            .map(|c| c.name = name.to_string())
            .is_some())
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let removed = self.categories.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(removed)
    }
}
