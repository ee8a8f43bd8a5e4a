use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Username recorded when the submitter no longer exists.
pub const UNKNOWN_USER: &str = "Unknown user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Snapshot taken at submission
    pub username: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// POST /create
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewReview {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

impl NewReview {
    pub fn into_review(self, user_id: Uuid, username: String) -> Review {
        Review {
            id: Uuid::now_v7(),
            user_id,
            username,
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}
