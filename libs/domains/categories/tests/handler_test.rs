//! Handler tests for the categories domain

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{AccessGuard, JwtConfig, Role, TokenService};
use domain_categories::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    admin: String,
    user: String,
}

fn setup() -> TestApp {
    let tokens = Arc::new(TokenService::new(&JwtConfig::new(
        "categories-handler-test-secret-0123456789",
    )));
    let router = handlers::router(
        CategoryService::new(InMemoryCategoryRepository::new()),
        AccessGuard::new(tokens.clone()),
    );

    TestApp {
        router,
        admin: tokens.issue(Uuid::now_v7(), "root", Role::Admin).unwrap(),
        user: tokens.issue(Uuid::now_v7(), "alice1", Role::User).unwrap(),
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_create_then_list() {
    let app = setup();

    let (status, body) = send(
        &app.router,
        "POST",
        "/create",
        Some(&app.admin),
        Some(json!({ "name": " Tech " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Tech");
    assert!(body["categoryId"].is_string());

    let (status, body) = send(
        &app.router,
        "POST",
        "/create",
        Some(&app.admin),
        Some(json!({ "name": "Tech" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category already exists");

    let (status, body) = send(&app.router, "GET", "/all", Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], 1);
    assert_eq!(body["results"][0]["name"], "Tech");

    let (status, names) = send(&app.router, "GET", "/public/all", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names, json!(["Tech"]));
}

#[tokio::test]
async fn test_admin_only_routes() {
    let app = setup();

    let (status, _) = send(&app.router, "GET", "/all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app.router, "GET", "/all", Some(&app.user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = setup();
    for name in ["Tech", "Sports"] {
        send(&app.router, "POST", "/create", Some(&app.admin), Some(json!({ "name": name }))).await;
    }
    let (_, list) = send(&app.router, "GET", "/all", Some(&app.admin), None).await;
    let sports_id = list["results"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/update/{sports_id}"),
        Some(&app.admin),
        Some(json!({ "name": "Tech" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/update/{sports_id}"),
        Some(&app.admin),
        Some(json!({ "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/update/{}", Uuid::now_v7()),
        Some(&app.admin),
        Some(json!({ "name": "Other" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/delete/{sports_id}");
    let (status, _) = send(&app.router, "DELETE", &uri, Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app.router, "DELETE", &uri, Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
