use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};
use axum_helpers::{AccessGuard, AuthUser, MessageResponse, ValidatedJson, access_guard};
use std::sync::Arc;

use crate::error::LikeResult;
use crate::models::{CastVote, RemoveVote, VoteQuery, VoteSummary};
use crate::repository::LikeRepository;
use crate::service::LikeService;

/// Create the `/api/likes` router. Every route needs a valid token.
pub fn router<R: LikeRepository + 'static>(service: LikeService<R>, guard: AccessGuard) -> Router {
    Router::new()
        .route(
            "/",
            get(vote_summary::<R>)
                .post(cast_vote::<R>)
                .delete(remove_vote::<R>),
        )
        .route_layer(middleware::from_fn_with_state(guard, access_guard))
        .with_state(Arc::new(service))
}

/// GET /?id_news=
async fn vote_summary<R: LikeRepository>(
    State(service): State<Arc<LikeService<R>>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<VoteQuery>,
) -> LikeResult<Json<VoteSummary>> {
    let summary = service
        .summary(claims.user_id(), query.id_news.as_deref())
        .await?;
    Ok(Json(summary))
}

async fn cast_vote<R: LikeRepository>(
    State(service): State<Arc<LikeService<R>>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<CastVote>,
) -> LikeResult<Json<MessageResponse>> {
    service.vote(claims.user_id(), input).await?;
    Ok(Json(MessageResponse::new("Vote recorded successfully")))
}

async fn remove_vote<R: LikeRepository>(
    State(service): State<Arc<LikeService<R>>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<RemoveVote>,
) -> LikeResult<Json<MessageResponse>> {
    service.unvote(claims.user_id(), &input.id_news).await?;
    Ok(Json(MessageResponse::new("Vote removed successfully")))
}
