//! In-process tests for the ask/history/delete flows, driving the router
//! directly with a stub completion client and either a real in-memory
//! store or a failing one.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use ai_chat_service::{AskResult, CompletionClient, FailureKind};
use api::AppState;
use interaction_store::{
    Interaction, InteractionStore, Result as StoreResult, SqliteInteractionStore, StoreError,
};

/* ------------------------------------------------------------------ */
/* Test doubles and helpers                                           */
/* ------------------------------------------------------------------ */

struct StubClient {
    result: AskResult,
    calls: AtomicUsize,
}

impl StubClient {
    fn success(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            result: AskResult::Success {
                answer: answer.to_owned(),
            },
            calls: AtomicUsize::new(0),
        })
    }

    fn failure(kind: FailureKind) -> Arc<Self> {
        Arc::new(Self {
            result: AskResult::Failure {
                error: "provider exploded".into(),
                kind,
            },
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn ask(&self, _question: &str) -> AskResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Store whose every operation fails with a database-layer error (except
/// `delete_all`, which fails with an unclassified one).
struct FailingStore;

#[async_trait]
impl InteractionStore for FailingStore {
    async fn create(&self, _question: &str, _answer: &str) -> StoreResult<Interaction> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn find_recent(
        &self,
        _limit: i64,
        _keyword: Option<&str>,
    ) -> StoreResult<Vec<Interaction>> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        Err(StoreError::Corrupt("mapping failure".into()))
    }
}

/// Store whose reads fail with a row-mapping error rather than a
/// database-layer one.
struct CorruptStore;

#[async_trait]
impl InteractionStore for CorruptStore {
    async fn create(&self, _question: &str, _answer: &str) -> StoreResult<Interaction> {
        Err(StoreError::Corrupt("mapping failure".into()))
    }

    async fn find_recent(
        &self,
        _limit: i64,
        _keyword: Option<&str>,
    ) -> StoreResult<Vec<Interaction>> {
        Err(StoreError::Corrupt("mapping failure".into()))
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        Err(StoreError::Corrupt("mapping failure".into()))
    }
}

async fn memory_store() -> Arc<SqliteInteractionStore> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    let store = SqliteInteractionStore::new(pool);
    store.migrate().await.expect("migrate");
    Arc::new(store)
}

fn app(completion: Arc<dyn CompletionClient>, store: Arc<dyn InteractionStore>) -> Router {
    api::router(AppState::new(completion, store))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("infallible");
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

async fn post_ask(app: &Router, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

async fn get_history(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

async fn delete_history(app: &Router) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("DELETE")
        .uri("/api/history")
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/* ------------------------------------------------------------------ */
/* Ask flow                                                           */
/* ------------------------------------------------------------------ */

#[tokio::test]
async fn ask_rejects_out_of_range_questions_without_calling_the_client() {
    let client = StubClient::success("never used");
    let app = app(client.clone(), memory_store().await);

    let (status, body) = post_ask(&app, json!({ "question": "hi" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid request");
    assert!(body["messages"]["question"].is_array());

    let long = "x".repeat(1001);
    let (status, _) = post_ask(&app, json!({ "question": long })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post_ask(&app, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["messages"]["question"].is_array());

    let (status, _) = post_ask(&app, json!({ "question": 42 })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ask_accepts_questions_exactly_at_the_length_bounds() {
    let store = memory_store().await;
    let app = app(StubClient::success("fits"), store.clone());

    let (status, body) = post_ask(&app, json!({ "question": "Hi?" })).await;
    assert_eq!(status, StatusCode::OK, "3-character question");
    assert_eq!(body["success"], true);
    assert!(body["id"].is_string());

    let max = "x".repeat(1000);
    let (status, body) = post_ask(&app, json!({ "question": max })).await;
    assert_eq!(status, StatusCode::OK, "1000-character question");
    assert_eq!(body["success"], true);
    assert!(body["id"].is_string());

    assert_eq!(store.find_recent(10, None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn ask_persists_and_returns_the_new_id() {
    let store = memory_store().await;
    let app = app(StubClient::success("Track your spending."), store.clone());

    let (status, body) = post_ask(&app, json!({ "question": "How do I budget?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["answer"], "Track your spending.");
    assert!(body["id"].is_string());
    assert!(body.get("warning").is_none());

    let saved = store.find_recent(10, None).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id.to_string(), body["id"].as_str().unwrap());
    assert_eq!(saved[0].question, "How do I budget?");
    assert_eq!(saved[0].answer, "Track your spending.");
}

#[tokio::test]
async fn ask_degrades_gracefully_when_persistence_fails() {
    let app = app(StubClient::success("still answered"), Arc::new(FailingStore));

    let (status, body) = post_ask(&app, json!({ "question": "Will this save?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["answer"], "still answered");
    assert_eq!(body["warning"], "Answer generated but not saved to history");
}

#[tokio::test]
async fn ask_size_gate_skips_persistence_for_oversized_answers() {
    let store = memory_store().await;
    let huge = "y".repeat(10_001);
    let app = app(StubClient::success(&huge), store.clone());

    let (status, body) = post_ask(&app, json!({ "question": "Tell me everything" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["warning"], "Content too large to save to history");
    assert_eq!(body["answer"].as_str().unwrap().len(), 10_001);

    assert!(store.find_recent(10, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn ask_maps_api_errors_to_422_with_the_fixed_message() {
    let app = app(
        StubClient::failure(FailureKind::ApiError),
        memory_store().await,
    );

    let (status, body) = post_ask(&app, json!({ "question": "Anything there?" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "AI Service Error");
    assert_eq!(
        body["message"],
        "The AI service is temporarily unavailable. Please try again in a few moments."
    );
}

#[tokio::test]
async fn ask_maps_network_and_service_errors_to_503() {
    for kind in [FailureKind::NetworkError, FailureKind::ServiceError] {
        let app = app(StubClient::failure(kind), memory_store().await);
        let (status, body) = post_ask(&app, json!({ "question": "Anything there?" })).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn ask_maps_general_errors_to_500() {
    let app = app(
        StubClient::failure(FailureKind::GeneralError),
        memory_store().await,
    );

    let (status, body) = post_ask(&app, json!({ "question": "Anything there?" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Unable to process your request. Please try again."
    );
}

#[tokio::test]
async fn ask_never_surfaces_the_raw_provider_error() {
    let app = app(
        StubClient::failure(FailureKind::ApiError),
        memory_store().await,
    );

    let (_, body) = post_ask(&app, json!({ "question": "Anything there?" })).await;
    assert!(!body.to_string().contains("provider exploded"));
}

/* ------------------------------------------------------------------ */
/* History flow                                                       */
/* ------------------------------------------------------------------ */

#[tokio::test]
async fn history_validates_the_limit_range() {
    let store = memory_store().await;
    store.create("q", "a").await.unwrap();
    let app = app(StubClient::success("unused"), store);

    for uri in [
        "/api/history?limit=0",
        "/api/history?limit=101",
        "/api/history?limit=abc",
    ] {
        let (status, body) = get_history(&app, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["error"], "Invalid limit");
        assert_eq!(body["message"], "Limit must be between 1 and 100");
    }
}

#[tokio::test]
async fn history_returns_newest_first_up_to_the_limit() {
    let store = memory_store().await;
    for i in 0..150 {
        store
            .create(&format!("q{i}"), &format!("a{i}"))
            .await
            .unwrap();
    }
    let app = app(StubClient::success("unused"), store);

    let (status, body) = get_history(&app, "/api/history?limit=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["meta"]["count"], 100);
    assert_eq!(body["meta"]["limit"], 100);
    assert_eq!(body["meta"]["keyword"], Value::Null);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 100);
    assert_eq!(data[0]["question"], "q149");
    assert_eq!(data[99]["question"], "q50");
}

#[tokio::test]
async fn history_defaults_to_ten_records() {
    let store = memory_store().await;
    for i in 0..15 {
        store.create(&format!("q{i}"), "a").await.unwrap();
    }
    let app = app(StubClient::success("unused"), store);

    let (_, body) = get_history(&app, "/api/history").await;
    assert_eq!(body["meta"]["limit"], 10);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn history_keyword_filter_is_case_sensitive() {
    let store = memory_store().await;
    store
        .create("How do I budget?", "Start with a list.")
        .await
        .unwrap();
    store
        .create("Savings advice", "Set a budget first.")
        .await
        .unwrap();
    store
        .create("Budget question", "Capitalized keyword only.")
        .await
        .unwrap();
    let app = app(StubClient::success("unused"), store);

    let (status, body) = get_history(&app, "/api/history?keyword=budget").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["keyword"], "budget");

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    for item in data {
        let q = item["question"].as_str().unwrap();
        let a = item["answer"].as_str().unwrap();
        assert!(q.contains("budget") || a.contains("budget"));
    }
}

#[tokio::test]
async fn history_maps_database_failures_to_503() {
    let app = app(StubClient::success("unused"), Arc::new(FailingStore));

    let (status, body) = get_history(&app, "/api/history").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Database error");
    assert_eq!(
        body["message"],
        "Unable to retrieve chat history due to database issue"
    );
}

#[tokio::test]
async fn history_maps_unclassified_failures_to_500() {
    let app = app(StubClient::success("unused"), Arc::new(CorruptStore));

    let (status, body) = get_history(&app, "/api/history").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Server error");
    assert_eq!(body["message"], "Unable to retrieve chat history");
}

/* ------------------------------------------------------------------ */
/* Delete flow                                                        */
/* ------------------------------------------------------------------ */

#[tokio::test]
async fn delete_clears_history_and_is_idempotent() {
    let store = memory_store().await;
    store.create("q1", "a1").await.unwrap();
    store.create("q2", "a2").await.unwrap();
    let app = app(StubClient::success("unused"), store);

    let (status, body) = delete_history(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "History deleted successfully.");

    let (_, body) = get_history(&app, "/api/history").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["meta"]["count"], 0);

    // Second delete operates on an already-empty set and still succeeds.
    let (status, body) = delete_history(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn delete_maps_store_failures_to_500() {
    let app = app(StubClient::success("unused"), Arc::new(FailingStore));

    let (status, body) = delete_history(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unable to delete history.");
}
