use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get},
};
use axum_helpers::{
    AccessGuard, AuthUser, CreatedResponse, MessageResponse, Role, UuidPath, ValidatedJson,
    access_guard,
};
use database::DailyCount;
use std::sync::Arc;

use crate::error::CommentResult;
use crate::models::{Comment, CommentsQuery, NewComment, RecentComment};
use crate::repository::CommentRepository;
use crate::service::CommentService;

/// Create the `/api/comments` router
pub fn router<R: CommentRepository + 'static>(
    service: CommentService<R>,
    guard: AccessGuard,
) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new().route("/", get(list_comments::<R>));

    let authenticated = Router::new()
        .route("/", axum::routing::post(create_comment::<R>))
        .route("/{id}", delete(delete_comment::<R>))
        .route_layer(middleware::from_fn_with_state(guard.clone(), access_guard));

    let admin = Router::new()
        .route("/recent", get(recent_comments::<R>))
        .route("/stats/growth", get(growth::<R>))
        .route_layer(middleware::from_fn_with_state(
            guard.require(&[Role::Admin]),
            access_guard,
        ));

    public
        .merge(authenticated)
        .merge(admin)
        .with_state(shared_service)
}

/// GET /?news_url=
async fn list_comments<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
    Query(query): Query<CommentsQuery>,
) -> CommentResult<Json<Vec<Comment>>> {
    Ok(Json(service.for_article(query.news_url.as_deref()).await?))
}

async fn recent_comments<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
) -> CommentResult<Json<Vec<RecentComment>>> {
    Ok(Json(service.recent().await?))
}

async fn create_comment<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<NewComment>,
) -> CommentResult<impl IntoResponse> {
    let id = service.create(&claims, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Comment added successfully", id)),
    ))
}

async fn delete_comment<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> CommentResult<Json<MessageResponse>> {
    service.delete(id, claims.user_id()).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

async fn growth<R: CommentRepository>(
    State(service): State<Arc<CommentService<R>>>,
) -> CommentResult<Json<Vec<DailyCount>>> {
    Ok(Json(service.growth().await?))
}
