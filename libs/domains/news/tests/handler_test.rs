//! Handler tests for the news domain

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{AccessGuard, JwtConfig, Role, TokenService};
use domain_news::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const BOUNDARY: &str = "newsroom-test-boundary";

struct TestApp {
    router: Router,
    admin: String,
    user: String,
    upload_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

fn setup() -> TestApp {
    let tokens = Arc::new(TokenService::new(&JwtConfig::new(
        "news-handler-test-secret-0123456789abc",
    )));
    let upload_dir = std::env::temp_dir().join(format!("news-handlers-{}", Uuid::new_v4()));
    let photos = PhotoStore::new(&UploadConfig {
        dir: upload_dir.clone(),
    });

    let service = NewsService::new(InMemoryNewsRepository::new(), photos);
    let guard = AccessGuard::new(tokens.clone());
    let router = handlers::router(service.clone(), guard.clone())
        .merge(handlers::category_stats_router(service, guard));

    TestApp {
        router,
        admin: tokens.issue(Uuid::now_v7(), "root", Role::Admin).unwrap(),
        user: tokens.issue(Uuid::now_v7(), "alice1", Role::User).unwrap(),
        upload_dir,
    }
}

fn multipart_body(fields: &[(&str, &str)], photo: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn send_form(app: &TestApp, method: &str, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", app.admin))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    read(app.router.clone().oneshot(request).await.unwrap()).await
}

async fn send(
    app: &TestApp,
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
    read(app.router.clone().oneshot(request.body(body).unwrap()).await.unwrap()).await
}

const FIELDS: [(&str, &str); 4] = [
    ("title", "Rust 2024 edition"),
    ("description", "The edition is out"),
    ("category", "Tech"),
    ("createdBy", "root"),
];

#[tokio::test]
async fn test_oversized_photo_is_rejected_with_413() {
    let app = setup();
    let photo = vec![0u8; handlers::PHOTO_BODY_LIMIT + 1];

    let (status, body) = send_form(
        &app,
        "POST",
        "/",
        multipart_body(&FIELDS, Some(("huge.png", &photo))),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["message"].is_string());

    let (_, list) = send(&app, "GET", "/", None, None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_with_photo_and_read_back() {
    let app = setup();

    let (status, body) = send_form(
        &app,
        "POST",
        "/",
        multipart_body(&FIELDS, Some(("cover.png", b"\x89PNG"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, article) = send(&app, "GET", &format!("/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(article["title"], "Rust 2024 edition");
    let photo_url = article["photoUrl"].as_str().unwrap();
    assert!(photo_url.starts_with("/uploads/") && photo_url.ends_with(".png"));

    let stored = app.upload_dir.join(photo_url.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"\x89PNG");

    let (status, list) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_without_photo_is_400() {
    let app = setup();
    let (status, body) = send_form(&app, "POST", "/", multipart_body(&FIELDS, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_update_keeps_photo_and_reports_missing() {
    let app = setup();
    let (_, body) = send_form(
        &app,
        "POST",
        "/",
        multipart_body(&FIELDS, Some(("cover.jpg", b"jpeg"))),
    )
    .await;
    let id = body["id"].as_str().unwrap().to_string();
    let (_, before) = send(&app, "GET", &format!("/{id}"), None, None).await;

    let mut fields = FIELDS;
    fields[0] = ("title", "Renamed");
    let (status, _) = send_form(
        &app,
        "PUT",
        &format!("/{id}"),
        multipart_body(&fields, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = send(&app, "GET", &format!("/{id}"), None, None).await;
    assert_eq!(after["title"], "Renamed");
    assert_eq!(after["photoUrl"], before["photoUrl"]);

    let (status, _) = send_form(&app, "PUT", "/missing", multipart_body(&FIELDS, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_write_routes_are_admin_only() {
    let app = setup();

    let request = Request::builder()
        .method("DELETE")
        .uri("/anything")
        .header("authorization", format!("Bearer {}", app.user))
        .body(Body::empty())
        .unwrap();
    let (status, body) = read(app.router.clone().oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    let (status, _) = send(&app, "GET", "/all-news", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sync_external_is_first_write_wins() {
    let app = setup();
    let story = json!({ "url": "https://example.com/story-1", "title": "Original" });

    let (status, body) = send(&app, "POST", "/sync-external", Some(&app.user), Some(story)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "https://example.com/story-1");

    let (status, _) = send(
        &app,
        "POST",
        "/sync-external",
        Some(&app.user),
        Some(json!({ "url": "https://example.com/story-1", "title": "Changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, article) = send(
        &app,
        "GET",
        "/https%3A%2F%2Fexample.com%2Fstory-1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(article["title"], "Original");
    assert_eq!(article["category"], "External");
    assert_eq!(article["createdBy"], "system");

    let (status, _) = send(
        &app,
        "POST",
        "/sync-external",
        Some(&app.user),
        Some(json!({ "url": "https://example.com/story-2" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_lookups() {
    let app = setup();
    for (url, title, category) in [
        ("https://example.com/a", "Rust wins", "Tech"),
        ("https://example.com/b", "Cup final", "Sports"),
    ] {
        send(
            &app,
            "POST",
            "/sync-external",
            Some(&app.user),
            Some(json!({ "url": url, "title": title, "category": category })),
        )
        .await;
    }

    let (status, tech) = send(&app, "GET", "/category/tech", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tech.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/category/politics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, found) = send(&app, "GET", "/search?title=RUST", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found[0]["title"], "Rust wins");

    let (status, _) = send(&app, "GET", "/search?title=", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = send(
        &app,
        "GET",
        "/all-news?category=SPORTS&limit=5",
        Some(&app.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["items"][0]["title"], "Cup final");

    let (status, distribution) = send(
        &app,
        "GET",
        "/stats/category-distribution",
        Some(&app.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(distribution.as_array().unwrap().len(), 2);
}
