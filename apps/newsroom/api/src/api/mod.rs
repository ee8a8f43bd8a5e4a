use axum::Router;
use std::io;
use std::path::Path;
use tower_http::services::ServeDir;

use crate::state::{Services, Storage};

pub mod activity;
pub mod favorites;
pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Cross-domain routes are merged into the nest of the domain whose path
/// they extend.
pub fn routes<S: Storage>(services: &Services<S>) -> Router {
    let guard = services.guard.clone();

    let auth = domain_users::handlers::router(
        services.users.clone(),
        guard.clone(),
        services.limiter.clone(),
    )
    .merge(activity::router(services));

    let news = domain_news::handlers::router(services.news.clone(), guard.clone())
        .merge(favorites::router(services));

    let categories =
        domain_categories::handlers::router(services.categories.clone(), guard.clone()).merge(
            domain_news::handlers::category_stats_router(services.news.clone(), guard.clone()),
        );

    Router::new()
        .nest("/auth", auth)
        .nest("/news", news)
        .nest("/category", categories)
        .nest(
            "/comments",
            domain_comments::handlers::router(services.comments.clone(), guard.clone()),
        )
        .nest(
            "/likes",
            domain_likes::handlers::router(services.likes.clone(), guard.clone()),
        )
        .nest(
            "/review",
            domain_reviews::handlers::router(services.reviews.clone(), guard),
        )
}

/// The `/api` tree with its middleware, plus stored photos at `/uploads`.
pub fn app<S: Storage>(services: &Services<S>, upload_dir: &Path) -> io::Result<Router> {
    let router = axum_helpers::create_router(routes(services))?;
    Ok(router.nest_service(domain_news::storage::PUBLIC_PREFIX, ServeDir::new(upload_dir)))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
