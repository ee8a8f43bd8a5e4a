use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Body of create and update requests. Trimmed by the service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryName {
    pub name: String,
}

/// GET /all
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryList {
    /// Number of categories
    pub category: usize,
    pub results: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Category),
    AlreadyExists,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreated {
    pub message: String,
    pub category_id: Uuid,
    pub name: String,
}
