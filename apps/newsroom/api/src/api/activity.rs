//! Per-user activity, built from the likes, comments and news domains.
//!
//! Mounted under `/api/auth`. The caller's own activity needs any valid
//! token; another user's needs the admin role.

use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};
use axum_helpers::{AccessGuard, AppError, AuthUser, Role, UuidPath, access_guard};
use chrono::{DateTime, Utc};
use database::{PageParams, PageResult};
use domain_users::UserSummary;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::state::{Services, Storage};

pub const ACTIVITY_PAGE_LIMIT: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    /// Likes only, dislikes excluded
    pub total_likes: u64,
    pub total_comments: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeActivity {
    pub id: Uuid,
    pub article_id: String,
    pub title: Option<String>,
    pub activity_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentActivity {
    pub id: Uuid,
    pub article_id: String,
    pub content: String,
    pub title: Option<String>,
    pub activity_date: DateTime<Utc>,
}

/// GET /users/{id}
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserSummary,
    #[serde(flatten)]
    pub stats: ActivityStats,
}

type SharedServices<S> = Arc<Services<S>>;

pub fn router<S: Storage>(services: &Services<S>) -> Router {
    let guard: AccessGuard = services.guard.clone();

    let own = Router::new()
        .route("/activity-stats", get(own_stats::<S>))
        .route("/activity/likes", get(own_likes::<S>))
        .route("/activity/comments", get(own_comments::<S>))
        .route_layer(middleware::from_fn_with_state(guard.clone(), access_guard));

    let admin = Router::new()
        .route("/activity-stats/{id}", get(user_stats::<S>))
        .route("/activity/likes/{id}", get(user_likes::<S>))
        .route("/activity/comments/{id}", get(user_comments::<S>))
        .route("/users/{id}", get(user_detail::<S>))
        .route_layer(middleware::from_fn_with_state(
            guard.require(&[Role::Admin]),
            access_guard,
        ));

    own.merge(admin).with_state(Arc::new(services.clone()))
}

async fn stats<S: Storage>(
    services: &Services<S>,
    user_id: Uuid,
) -> Result<ActivityStats, AppError> {
    let total_likes = services.likes.count_liked(user_id).await?;
    let total_comments = services.comments.count_by_user(user_id).await?;
    Ok(ActivityStats {
        total_likes,
        total_comments,
    })
}

/// Titles of the given articles; deleted articles are absent.
async fn titles<'a, S: Storage>(
    services: &Services<S>,
    article_ids: impl Iterator<Item = &'a String>,
) -> Result<HashMap<String, String>, AppError> {
    let mut ids: Vec<String> = article_ids.cloned().collect();
    ids.sort();
    ids.dedup();

    let refs = services.news.refs(ids).await?;
    Ok(refs.into_iter().map(|r| (r.id, r.title)).collect())
}

async fn likes<S: Storage>(
    services: &Services<S>,
    user_id: Uuid,
    params: PageParams,
) -> Result<PageResult<LikeActivity>, AppError> {
    let page = params.into_request(ACTIVITY_PAGE_LIMIT);
    let history = services.likes.history(user_id, page).await?;
    let titles = titles(services, history.items.iter().map(|l| &l.article_id)).await?;

    Ok(history.map(|like| LikeActivity {
        title: titles.get(&like.article_id).cloned(),
        id: like.id,
        article_id: like.article_id,
        activity_date: like.activity_date,
    }))
}

async fn comments<S: Storage>(
    services: &Services<S>,
    user_id: Uuid,
    params: PageParams,
) -> Result<PageResult<CommentActivity>, AppError> {
    let page = params.into_request(ACTIVITY_PAGE_LIMIT);
    let history = services.comments.history(user_id, page).await?;
    let titles = titles(services, history.items.iter().map(|c| &c.article_id)).await?;

    Ok(history.map(|comment| CommentActivity {
        title: titles.get(&comment.article_id).cloned(),
        id: comment.id,
        article_id: comment.article_id,
        content: comment.content,
        activity_date: comment.activity_date,
    }))
}

async fn own_stats<S: Storage>(
    State(services): State<SharedServices<S>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ActivityStats>, AppError> {
    Ok(Json(stats(&services, claims.user_id()).await?))
}

async fn user_stats<S: Storage>(
    State(services): State<SharedServices<S>>,
    UuidPath(id): UuidPath,
) -> Result<Json<ActivityStats>, AppError> {
    Ok(Json(stats(&services, id).await?))
}

async fn own_likes<S: Storage>(
    State(services): State<SharedServices<S>>,
    AuthUser(claims): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResult<LikeActivity>>, AppError> {
    Ok(Json(likes(&services, claims.user_id(), params).await?))
}

async fn user_likes<S: Storage>(
    State(services): State<SharedServices<S>>,
    UuidPath(id): UuidPath,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResult<LikeActivity>>, AppError> {
    Ok(Json(likes(&services, id, params).await?))
}

async fn own_comments<S: Storage>(
    State(services): State<SharedServices<S>>,
    AuthUser(claims): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResult<CommentActivity>>, AppError> {
    Ok(Json(comments(&services, claims.user_id(), params).await?))
}

async fn user_comments<S: Storage>(
    State(services): State<SharedServices<S>>,
    UuidPath(id): UuidPath,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResult<CommentActivity>>, AppError> {
    Ok(Json(comments(&services, id, params).await?))
}

async fn user_detail<S: Storage>(
    State(services): State<SharedServices<S>>,
    UuidPath(id): UuidPath,
) -> Result<Json<UserDetail>, AppError> {
    let user = services.users.get_user(id).await?;
    let stats = stats(&services, id).await?;
    Ok(Json(UserDetail {
        user: UserSummary::from(user),
        stats,
    }))
}
