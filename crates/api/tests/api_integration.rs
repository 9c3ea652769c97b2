//! API integration tests.
//!
//! Requests run through the full router and auth middleware against a
//! migrated in-memory database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
};
use hushboard_api::{AppState, Claims, TokenVerifier, auth_middleware, router as api_router};
use hushboard_core::{
    AdminReviewService, AutoReporter, ContentService, ContentStore, DisabledVerifier,
    ModerationLogService, ReportService, SubmissionGuard, UserService,
};
use hushboard_db::{
    repositories::{
        MessageRepository, ModerationLogRepository, PostLikeRepository, PostRepository,
        ReplyRepository, ReportRepository, UserRepository,
    },
    test_utils::TestDatabase,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "test-secret";
const ADMIN: &str = "uid-admin";

struct TestApp {
    _db: TestDatabase,
    app: Router,
}

async fn create_test_app() -> TestApp {
    let db = TestDatabase::in_memory().await.expect("test database");
    let conn = db.connection();

    let report_service = ReportService::new(ReportRepository::new(conn.clone()));
    let log_service = ModerationLogService::new(ModerationLogRepository::new(conn.clone()));
    let content_service = ContentService::new(
        PostRepository::new(conn.clone()),
        ReplyRepository::new(conn.clone()),
        MessageRepository::new(conn.clone()),
        PostLikeRepository::new(conn.clone()),
        SubmissionGuard::builtin(),
        AutoReporter::new(report_service.clone(), log_service.clone()),
    );
    let admin_review_service = AdminReviewService::new(
        UserRepository::new(conn.clone()),
        report_service.clone(),
        ContentStore::new(
            PostRepository::new(conn.clone()),
            MessageRepository::new(conn.clone()),
            ReplyRepository::new(conn.clone()),
        ),
        log_service,
    );
    let user_service = UserService::new(UserRepository::new(conn), vec![ADMIN.to_string()]);

    let state = AppState {
        user_service,
        content_service,
        report_service,
        admin_review_service,
        bot_verifier: Arc::new(DisabledVerifier),
        token_verifier: TokenVerifier::new(SECRET),
    };

    let app = Router::new()
        .nest("/api", api_router())
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);

    TestApp { _db: db, app }
}

fn token_for(uid: &str) -> String {
    let claims = Claims {
        sub: uid.to_string(),
        anonymous: false,
        name: None,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn call(app: &Router, uri: &str, uid: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(uid) = uid {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(uid)));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn pending_reports(app: &Router) -> Vec<Value> {
    let (status, body) = call(app, "/api/admin/reports/pending", Some(ADMIN), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    body["data"].as_array().unwrap().clone()
}

#[tokio::test]
async fn test_create_post_requires_token() {
    let t = create_test_app().await;

    let (status, body) = call(
        &t.app,
        "/api/posts/create",
        None,
        json!({"board": "general", "title": "Hi", "content": "Hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_unauthenticated() {
    let t = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/posts/create")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::from(
            json!({"board": "general", "title": "Hi", "content": "Hello"}).to_string(),
        ))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_filtered_post_is_masked_and_queued() {
    let t = create_test_app().await;

    let (status, body) = call(
        &t.app,
        "/api/posts/create",
        Some("uid-alice"),
        json!({"board": "General", "title": "Shit", "content": "what the fuck"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["wasFiltered"], true);
    assert_eq!(body["data"]["title"], "****");
    assert_eq!(body["data"]["content"], "what the ****");
    assert_eq!(body["data"]["board"], "general");

    let pending = pending_reports(&t.app).await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["report"]["targetType"], "post");
    assert_eq!(pending[0]["report"]["reporterId"], "uid-alice");
    assert_eq!(pending[0]["content"]["type"], "post");
}

#[tokio::test]
async fn test_clean_post_is_not_queued() {
    let t = create_test_app().await;

    let (status, body) = call(
        &t.app,
        "/api/posts/create",
        Some("uid-alice"),
        json!({"board": "general", "title": "Scunthorpe", "content": "Lovely town"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["wasFiltered"], false);
    assert!(pending_reports(&t.app).await.is_empty());
}

#[tokio::test]
async fn test_validation_error_shape() {
    let t = create_test_app().await;

    let (status, body) = call(
        &t.app,
        "/api/posts/create",
        Some("uid-alice"),
        json!({"board": "general", "title": "", "content": "Hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_non_admin_cannot_moderate() {
    let t = create_test_app().await;

    for uri in [
        "/api/admin/reports/pending",
        "/api/admin/logs",
    ] {
        let (status, body) = call(&t.app, uri, Some("uid-bob"), json!({})).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    let (status, _) = call(
        &t.app,
        "/api/admin/reports/keep",
        Some("uid-bob"),
        json!({"reportId": "missing"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_report_then_keep() {
    let t = create_test_app().await;

    let (_, created) = call(
        &t.app,
        "/api/posts/create",
        Some("uid-alice"),
        json!({"board": "general", "title": "Buy now", "content": "Cheap watches"}),
    )
    .await;
    let post_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, report) = call(
        &t.app,
        "/api/reports/create",
        Some("uid-bob"),
        json!({"target": {"type": "post", "id": post_id}, "reason": "spam"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["data"]["reason"], "Spam");
    assert_eq!(report["data"]["status"], "pending");
    let report_id = report["data"]["id"].as_str().unwrap().to_string();

    let (status, kept) = call(
        &t.app,
        "/api/admin/reports/keep",
        Some(ADMIN),
        json!({"reportId": report_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kept["data"]["status"], "dismissed");
    assert_eq!(kept["data"]["resolvedBy"], ADMIN);

    let (status, again) = call(
        &t.app,
        "/api/admin/reports/delete",
        Some(ADMIN),
        json!({"reportId": report_id}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["error"]["code"], "CONFLICT");

    let (status, shown) = call(&t.app, "/api/posts/show", None, json!({"postId": post_id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["data"]["title"], "Buy now");

    let (_, logs) = call(&t.app, "/api/admin/logs", Some(ADMIN), json!({})).await;
    let logs = logs["data"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["action"], "KEEP_CONTENT");
    assert_eq!(logs[0]["details"], "Reason: Spam");
}

#[tokio::test]
async fn test_admin_delete_removes_message() {
    let t = create_test_app().await;

    let (status, created) = call(
        &t.app,
        "/api/messages/create",
        Some("uid-alice"),
        json!({"recipient": "Sam", "content": "you are an asshole"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["data"]["wasFiltered"], true);
    assert_eq!(created["data"]["recipient"], "sam");
    assert!(created["data"].get("userId").is_none());

    let pending = pending_reports(&t.app).await;
    assert_eq!(pending.len(), 1);
    let report_id = pending[0]["report"]["id"].as_str().unwrap().to_string();

    let (status, outcome) = call(
        &t.app,
        "/api/admin/reports/delete",
        Some(ADMIN),
        json!({"reportId": report_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["data"]["contentRemoved"], true);
    assert_eq!(outcome["data"]["report"]["status"], "resolved");

    let (_, listed) = call(&t.app, "/api/messages/list", None, json!({"recipient": "SAM"})).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
    assert!(pending_reports(&t.app).await.is_empty());
}

#[tokio::test]
async fn test_unknown_report_is_not_found() {
    let t = create_test_app().await;

    let (status, body) = call(
        &t.app,
        "/api/admin/reports/keep",
        Some(ADMIN),
        json!({"reportId": "nope"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "REPORT_NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_route() {
    let t = create_test_app().await;

    let (status, _) = call(&t.app, "/api/nowhere", None, json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
