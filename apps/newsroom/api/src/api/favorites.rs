//! Most-liked articles, mounted under `/api/news`.

use axum::{Json, Router, extract::State, middleware, routing::get};
use axum_helpers::{AppError, Role, access_guard};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::{Services, Storage};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteArticle {
    pub id: String,
    pub title: String,
    pub photo_url: Option<String>,
    pub like_count: i64,
}

pub fn router<S: Storage>(services: &Services<S>) -> Router {
    Router::new()
        .route("/favorites/top", get(top_favorites::<S>))
        .route_layer(middleware::from_fn_with_state(
            services.guard.clone().require(&[Role::Admin]),
            access_guard,
        ))
        .with_state(Arc::new(services.clone()))
}

/// Ordered by like count; liked articles that were since deleted are skipped.
async fn top_favorites<S: Storage>(
    State(services): State<Arc<Services<S>>>,
) -> Result<Json<Vec<FavoriteArticle>>, AppError> {
    let top = services.likes.top_liked().await?;
    let refs = services
        .news
        .refs(top.iter().map(|t| t.article_id.clone()).collect())
        .await?;
    let mut refs: HashMap<String, _> = refs.into_iter().map(|r| (r.id.clone(), r)).collect();

    Ok(Json(
        top.into_iter()
            .filter_map(|t| {
                refs.remove(&t.article_id).map(|article| FavoriteArticle {
                    id: article.id,
                    title: article.title,
                    photo_url: article.photo_url,
                    like_count: t.like_count,
                })
            })
            .collect(),
    ))
}
