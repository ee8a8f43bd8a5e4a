use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use axum_helpers::{AccessGuard, MessageResponse, Role, UuidPath, ValidatedJson, access_guard};
use std::sync::Arc;

use crate::error::CategoryResult;
use crate::models::{CategoryCreated, CategoryList, CategoryName, CreateOutcome};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

/// Create the `/api/category` router
pub fn router<R: CategoryRepository + 'static>(
    service: CategoryService<R>,
    guard: AccessGuard,
) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new().route("/public/all", get(public_names::<R>));

    let admin = Router::new()
        .route("/all", get(list_categories::<R>))
        .route("/create", post(create_category::<R>))
        .route("/update/{id}", put(update_category::<R>))
        .route("/delete/{id}", delete(delete_category::<R>))
        .route_layer(middleware::from_fn_with_state(
            guard.require(&[Role::Admin]),
            access_guard,
        ));

    public.merge(admin).with_state(shared_service)
}

async fn public_names<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CategoryResult<Json<Vec<String>>> {
    Ok(Json(service.names().await?))
}

async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CategoryResult<Json<CategoryList>> {
    Ok(Json(service.list().await?))
}

/// 201 for a new category, 200 when the name already exists.
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CategoryName>,
) -> CategoryResult<Response> {
    let response = match service.create(&input.name).await? {
        CreateOutcome::Created(category) => (
            StatusCode::CREATED,
            Json(CategoryCreated {
                message: "Category created successfully".to_string(),
                category_id: category.id,
                name: category.name,
            }),
        )
            .into_response(),
        CreateOutcome::AlreadyExists => (
            StatusCode::OK,
            Json(MessageResponse::new("Category already exists")),
        )
            .into_response(),
    };
    Ok(response)
}

async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<CategoryName>,
) -> CategoryResult<Json<MessageResponse>> {
    service.rename(id, &input.name).await?;
    Ok(Json(MessageResponse::new("Category updated successfully")))
}

async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
) -> CategoryResult<Json<MessageResponse>> {
    service.delete(id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
