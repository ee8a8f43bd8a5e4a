use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Author's username; joined from `users` when read from Postgres
    pub username: String,
    pub article_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        article_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            username: username.into(),
            article_id: article_id.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// POST /
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(min = 1, message = "news_url is required"))]
    pub news_url: String,
}

/// GET /?news_url=
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentsQuery {
    pub news_url: Option<String>,
}

/// Admin dashboard row. `news_title` is absent when the article is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentComment {
    pub content: String,
    pub username: String,
    pub news_title: Option<String>,
    pub article_id: String,
}

/// One entry of a user's comment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserComment {
    pub id: Uuid,
    pub article_id: String,
    pub content: String,
    pub activity_date: DateTime<Utc>,
}

impl From<&Comment> for UserComment {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            article_id: comment.article_id.clone(),
            content: comment.content.clone(),
            activity_date: comment.created_at,
        }
    }
}
