use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AccessGuard, AuthUser, CreatedResponse, MessageResponse, Role, UuidPath, ValidatedJson,
    access_guard,
};
use database::{PageParams, PageResult};
use std::sync::Arc;

use crate::error::ReviewResult;
use crate::models::{NewReview, Review};
use crate::repository::ReviewRepository;
use crate::service::{ReviewService, SubmitterDirectory};

pub const REVIEWS_PAGE_LIMIT: u64 = 20;

type SharedService<R, D> = Arc<ReviewService<R, D>>;

/// Create the `/api/review` router
pub fn router<R, D>(service: ReviewService<R, D>, guard: AccessGuard) -> Router
where
    R: ReviewRepository + 'static,
    D: SubmitterDirectory + 'static,
{
    let shared_service = Arc::new(service);

    let authenticated = Router::new()
        .route("/create", post(submit_review::<R, D>))
        .route_layer(middleware::from_fn_with_state(guard.clone(), access_guard));

    let admin = Router::new()
        .route("/", get(list_reviews::<R, D>))
        .route(
            "/{id}",
            get(get_review::<R, D>).delete(delete_review::<R, D>),
        )
        .route_layer(middleware::from_fn_with_state(
            guard.require(&[Role::Admin]),
            access_guard,
        ));

    authenticated.merge(admin).with_state(shared_service)
}

/// GET /?page=&limit=&sortOrder=&search=
async fn list_reviews<R: ReviewRepository, D: SubmitterDirectory>(
    State(service): State<SharedService<R, D>>,
    Query(params): Query<PageParams>,
) -> ReviewResult<Json<PageResult<Review>>> {
    let page = params.into_request(REVIEWS_PAGE_LIMIT);
    Ok(Json(service.list(page).await?))
}

async fn get_review<R: ReviewRepository, D: SubmitterDirectory>(
    State(service): State<SharedService<R, D>>,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<Review>> {
    Ok(Json(service.get(id).await?))
}

async fn submit_review<R: ReviewRepository, D: SubmitterDirectory>(
    State(service): State<SharedService<R, D>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<NewReview>,
) -> ReviewResult<impl IntoResponse> {
    let id = service.submit(claims.user_id(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Review submitted successfully", id)),
    ))
}

async fn delete_review<R: ReviewRepository, D: SubmitterDirectory>(
    State(service): State<SharedService<R, D>>,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<MessageResponse>> {
    service.delete(id).await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}
