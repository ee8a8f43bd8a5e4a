use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const EXTERNAL_CATEGORY: &str = "External";
pub const SYSTEM_AUTHOR: &str = "system";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// v7 UUID for admin-created articles, source URL for synced ones
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub created_by: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the admin news listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            category: article.category.clone(),
            created_at: article.created_at,
        }
    }
}

/// Title and photo of an article, resolved for other domains' listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRef {
    pub id: String,
    pub title: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Required text fields of the create/update forms.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
}

#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Multipart form as received; presence is checked by the service.
#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: Option<String>,
    pub photo: Option<PhotoUpload>,
}

impl ArticleForm {
    /// `None` if any text field is missing or blank.
    pub fn fields(&self) -> Option<ArticleFields> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(ArticleFields {
            title: present(&self.title)?,
            description: present(&self.description)?,
            category: present(&self.category)?,
            created_by: present(&self.created_by)?,
        })
    }
}

/// POST /sync-external
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncArticle {
    #[validate(length(min = 1, message = "URL and title are required"))]
    pub url: String,
    #[validate(length(min = 1, message = "URL and title are required"))]
    pub title: String,
    pub description: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

impl SyncArticle {
    pub fn into_article(self) -> Article {
        Article {
            id: self.url,
            title: self.title,
            description: self.description,
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| EXTERNAL_CATEGORY.to_string()),
            created_by: SYSTEM_AUTHOR.to_string(),
            photo_url: self.url_to_image,
            created_at: self.published_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryFilter {
    pub category: Option<String>,
}
