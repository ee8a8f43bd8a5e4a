//! Handler tests for the likes domain

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{AccessGuard, JwtConfig, Role, TokenService};
use domain_likes::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    tokens: Arc<TokenService>,
}

fn setup() -> TestApp {
    let tokens = Arc::new(TokenService::new(&JwtConfig::new(
        "likes-handler-test-secret-0123456789ab",
    )));
    let router = handlers::router(
        LikeService::new(InMemoryLikeRepository::new()),
        AccessGuard::new(tokens.clone()),
    );
    TestApp { router, tokens }
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

    let response = app.router.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_vote_flow() {
    let app = setup();
    let alice = app.tokens.issue(Uuid::now_v7(), "alice1", Role::User).unwrap();
    let bob = app.tokens.issue(Uuid::now_v7(), "bob22", Role::User).unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/",
        Some(&alice),
        Some(json!({ "id_news": "a", "value": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    send(&app, "POST", "/", Some(&alice), Some(json!({ "id_news": "a", "value": true }))).await;
    send(&app, "POST", "/", Some(&bob), Some(json!({ "id_news": "a", "value": false }))).await;

    let (status, summary) = send(&app, "GET", "/?id_news=a", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summary,
        json!({ "userLikeStatus": true, "likeCount": 1, "dislikeCount": 1 })
    );

    let (status, _) = send(&app, "DELETE", "/", Some(&bob), Some(json!({ "id_news": "a" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/", Some(&bob), Some(json!({ "id_news": "a" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, summary) = send(&app, "GET", "/?id_news=a", Some(&bob), None).await;
    assert_eq!(
        summary,
        json!({ "userLikeStatus": null, "likeCount": 1, "dislikeCount": 0 })
    );
}

#[tokio::test]
async fn test_bad_requests() {
    let app = setup();
    let alice = app.tokens.issue(Uuid::now_v7(), "alice1", Role::User).unwrap();

    let (status, _) = send(&app, "GET", "/", Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for body in [
        json!({ "value": true }),
        json!({ "id_news": "", "value": true }),
        json!({ "id_news": "a", "value": "yes" }),
    ] {
        let (status, _) = send(&app, "POST", "/", Some(&alice), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_token_required() {
    let app = setup();
    let (status, _) = send(&app, "GET", "/?id_news=a", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/?id_news=a", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
