use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, Query, State,
        multipart::MultipartRejection,
    },
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AccessGuard, AppError, CreatedResponse, MessageResponse, Role, ValidatedJson, access_guard,
};
use database::{DailyCount, PageParams, PageResult};
use std::sync::Arc;

use crate::error::NewsResult;
use crate::models::{
    Article, ArticleForm, ArticleSummary, CategoryCount, CategoryFilter, PhotoUpload, SearchQuery,
    SyncArticle,
};
use crate::repository::NewsRepository;
use crate::service::NewsService;

pub const NEWS_PAGE_LIMIT: u64 = 20;
/// Request body cap for the multipart create/update routes
pub const PHOTO_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Create the `/api/news` router
pub fn router<R: NewsRepository + 'static>(service: NewsService<R>, guard: AccessGuard) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/", get(list_all::<R>))
        .route("/category/{name}", get(by_category::<R>))
        .route("/search", get(search::<R>))
        .route("/{id}", get(get_article::<R>));

    let authenticated = Router::new()
        .route("/sync-external", post(sync_external::<R>))
        .route_layer(middleware::from_fn_with_state(guard.clone(), access_guard));

    let admin = Router::new()
        .route("/all-news", get(all_news::<R>))
        .route("/stats/growth", get(growth::<R>))
        .route("/", post(create_article::<R>))
        .route(
            "/{id}",
            axum::routing::put(update_article::<R>).delete(delete_article::<R>),
        )
        .layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT))
        .route_layer(middleware::from_fn_with_state(
            guard.require(&[Role::Admin]),
            access_guard,
        ));

    public
        .merge(authenticated)
        .merge(admin)
        .with_state(shared_service)
}

/// `GET /stats/category-distribution`, mounted under `/api/category`.
pub fn category_stats_router<R: NewsRepository + 'static>(
    service: NewsService<R>,
    guard: AccessGuard,
) -> Router {
    Router::new()
        .route("/stats/category-distribution", get(category_distribution::<R>))
        .route_layer(middleware::from_fn_with_state(
            guard.require(&[Role::Admin]),
            access_guard,
        ))
        .with_state(Arc::new(service))
}

async fn list_all<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
) -> NewsResult<Json<Vec<Article>>> {
    Ok(Json(service.list_all().await?))
}

async fn by_category<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
    Path(name): Path<String>,
) -> NewsResult<Json<Vec<Article>>> {
    Ok(Json(service.by_category(&name).await?))
}

/// GET /search?title=
async fn search<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
    Query(query): Query<SearchQuery>,
) -> NewsResult<Json<Vec<Article>>> {
    Ok(Json(service.search(query.title.as_deref()).await?))
}

/// GET /all-news?page=&limit=&sortOrder=&search=&category=
async fn all_news<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
    Query(params): Query<PageParams>,
    Query(filter): Query<CategoryFilter>,
) -> NewsResult<Json<PageResult<ArticleSummary>>> {
    let page = params.into_request(NEWS_PAGE_LIMIT);
    Ok(Json(service.list_page(page, filter.category).await?))
}

async fn get_article<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
    Path(id): Path<String>,
) -> NewsResult<Json<Article>> {
    Ok(Json(service.get(&id).await?))
}

async fn growth<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
) -> NewsResult<Json<Vec<DailyCount>>> {
    Ok(Json(service.growth().await?))
}

async fn category_distribution<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
) -> NewsResult<Json<Vec<CategoryCount>>> {
    Ok(Json(service.category_distribution().await?))
}

/// Collects the article form. Unknown parts are skipped; an empty file
/// part counts as no photo.
async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ArticleForm, AppError> {
    let mut multipart = multipart?;
    let mut form = ArticleForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.photo = Some(PhotoUpload { file_name, bytes });
                }
            }
            "title" => form.title = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "category" => form.category = Some(field.text().await?),
            "createdBy" => form.created_by = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}

/// POST / (multipart)
async fn create_article<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(multipart).await?;
    let id = service.create(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new("Article created successfully", id)),
    ))
}

/// PUT /{id} (multipart)
async fn update_article<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let form = read_form(multipart).await?;
    service.update(&id, form).await?;
    Ok(Json(MessageResponse::new("Article updated successfully")))
}

async fn delete_article<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
    Path(id): Path<String>,
) -> NewsResult<Json<MessageResponse>> {
    service.delete(&id).await?;
    Ok(Json(MessageResponse::new("Article deleted successfully")))
}

/// POST /sync-external
async fn sync_external<R: NewsRepository>(
    State(service): State<Arc<NewsService<R>>>,
    ValidatedJson(input): ValidatedJson<SyncArticle>,
) -> NewsResult<Json<CreatedResponse<String>>> {
    let id = service.sync_external(input).await?;
    Ok(Json(CreatedResponse::new("External article synced", id)))
}
