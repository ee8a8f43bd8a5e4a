use std::sync::Arc;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CategoryList, CreateOutcome};
use crate::repository::CategoryRepository;

pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn required_name(name: &str) -> CategoryResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryError::Validation(
            "Category name is required".to_string(),
        ));
    }
    Ok(name)
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list(&self) -> CategoryResult<CategoryList> {
        let results = self.repository.list().await?;
        Ok(CategoryList {
            category: results.len(),
            results,
        })
    }

    pub async fn names(&self) -> CategoryResult<Vec<String>> {
        let all = self.repository.list().await?;
        Ok(all.into_iter().map(|c| c.name).collect())
    }

    /// An existing name is reported, not treated as an error.
    pub async fn create(&self, name: &str) -> CategoryResult<CreateOutcome> {
        let name = required_name(name)?;

        if self.repository.get_by_name(name).await?.is_some() {
            return Ok(CreateOutcome::AlreadyExists);
        }

        match self.repository.create(Category::new(name)).await {
            Ok(category) => Ok(CreateOutcome::Created(category)),
            Err(CategoryError::Duplicate) => Ok(CreateOutcome::AlreadyExists),
            Err(e) => Err(e),
        }
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> CategoryResult<()> {
        let name = required_name(name)?;
        if !self.repository.rename(id, name).await? {
            return Err(CategoryError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> CategoryResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CategoryError::NotFound);
        }
        Ok(())
    }
}
