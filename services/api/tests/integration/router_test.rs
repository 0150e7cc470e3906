use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use yamdb_api::infra::mail::{AppMailer, LogMailer};
use yamdb_api::router::build_router;
use yamdb_api::state::AppState;
use yamdb_auth_types::identity::TokenSecret;
use yamdb_testing::auth::{MockAuth, TEST_SECRET};

use crate::helpers::test_codes;

/// Router over a disconnected database: only paths that fail before the
/// first query can be exercised here.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        token_secret: TokenSecret::new(TEST_SECRET),
        codes: test_codes(),
        access_token_ttl_secs: 3600,
        mailer: AppMailer::Log(LogMailer),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn title_body() -> Value {
    json!({ "name": "Heat", "year": 1995 })
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_live_but_not_ready_without_database() {
    let server = server();

    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(
        server.get("/readyz").await.status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn should_attach_request_id() {
    let response = server().get("/healthz").await;

    assert!(response.maybe_header("x-request-id").is_some());
}

// ── Authentication ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_anonymous_title_create() {
    let response = server().post("/titles").json(&title_body()).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_forbid_title_create_for_plain_user() {
    let (name, value) = MockAuth::user().header();

    let response = server()
        .post("/titles")
        .add_header(name, value)
        .json(&title_body())
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_reject_invalid_bearer_instead_of_downgrading() {
    let response = server()
        .get("/titles")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-a-jwt"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_require_token_for_own_profile() {
    let response = server().get("/users/me").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_anonymous_review() {
    let path = format!("/titles/{}/reviews", Uuid::now_v7());

    let response = server()
        .post(&path)
        .json(&json!({ "score": 7, "text": "Great" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ── Auth endpoints ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_reserved_username_at_signup() {
    let response = server()
        .post("/auth/signup")
        .json(&json!({ "username": "me", "email": "me@example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["field"], "username");
    assert_eq!(body["reason"], "reserved_username");
}

#[tokio::test]
async fn should_require_fields_for_token() {
    let response = server().post("/auth/token").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["reason"], "required");
}
