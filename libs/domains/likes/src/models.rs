use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// `value` is `true` for a like and `false` for a dislike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub article_id: String,
    pub value: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(user_id: Uuid, article_id: impl Into<String>, value: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            article_id: article_id.into(),
            value,
            created_at: now,
            updated_at: now,
        }
    }
}

/// GET /?id_news=
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteQuery {
    pub id_news: Option<String>,
}

/// POST /
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CastVote {
    #[validate(length(min = 1, message = "id_news is required"))]
    pub id_news: String,
    pub value: bool,
}

/// DELETE /
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RemoveVote {
    #[validate(length(min = 1, message = "id_news is required"))]
    pub id_news: String,
}

/// Article totals plus the caller's own vote, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
    pub user_like_status: Option<bool>,
    pub like_count: i64,
    pub dislike_count: i64,
}

/// One entry of a user's like history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedArticle {
    pub id: Uuid,
    pub article_id: String,
    pub activity_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLiked {
    pub article_id: String,
    pub like_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_shape() {
        let summary = VoteSummary {
            user_like_status: None,
            like_count: 2,
            dislike_count: 1,
        };
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            json!({ "userLikeStatus": null, "likeCount": 2, "dislikeCount": 1 })
        );
    }

    #[test]
    fn test_cast_vote_requires_boolean() {
        let parse = |body| serde_json::from_value::<CastVote>(body);
        assert!(parse(json!({ "id_news": "a", "value": "yes" })).is_err());
        assert!(parse(json!({ "id_news": "a" })).is_err());
        assert!(parse(json!({ "id_news": "a", "value": false })).is_ok());
    }
}
