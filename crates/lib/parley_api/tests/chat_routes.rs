//! Integration tests: build the router over the in-memory store and a
//! canned model, drive it with `oneshot`, assert status codes and bodies.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use parley_api::{AppState, config::ApiConfig};
use parley_core::llm::{ChatModel, CompletionMessage, LlmError};
use parley_core::store::MemoryChatStore;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Echoes the last prompt back, or fails the way it was told to.
enum CannedModel {
    Echo,
    RateLimited,
    Broken,
}

#[async_trait]
impl ChatModel for CannedModel {
    async fn complete(&self, messages: &[CompletionMessage]) -> Result<String, LlmError> {
        match self {
            CannedModel::Echo => Ok(format!(
                "echo: {}",
                messages.last().map(|m| m.content.as_str()).unwrap_or_default()
            )),
            CannedModel::RateLimited => Err(LlmError::RateLimited),
            CannedModel::Broken => Err(LlmError::Transport("connection refused".into())),
        }
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn app(model: CannedModel) -> Router {
    let state = AppState::new(
        Arc::new(MemoryChatStore::new()),
        Arc::new(model),
        ApiConfig::default(),
    );
    parley_api::router(state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    (status, json)
}

async fn send(app: &Router, user: &str, chat_id: Option<&str>, prompt: &str) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        "/api/chat",
        Some(json!({ "userId": user, "chatId": chat_id, "prompt": prompt })),
    )
    .await
}

#[tokio::test]
async fn new_prompt_creates_chat_and_returns_reply() {
    let app = app(CannedModel::Echo);

    let (status, body) = send(&app, "user_a", None, "What is Rust?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "echo: What is Rust?");
    let chat_id = body["chatId"].as_str().expect("chatId").to_string();

    let (status, chat) = call(
        &app,
        Method::GET,
        &format!("/api/chats/{chat_id}?userId=user_a"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chat["title"], "What is Rust?...");
    assert_eq!(chat["userId"], "user_a");
    let messages = chat["messages"].as_array().expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "model");
    assert_eq!(messages[1]["content"], "echo: What is Rust?");
}

#[tokio::test]
async fn transcript_is_returned_in_creation_order() {
    let app = app(CannedModel::Echo);
    let (_, first) = send(&app, "user_a", None, "one").await;
    let chat_id = first["chatId"].as_str().unwrap().to_string();
    send(&app, "user_a", Some(&chat_id), "two").await;
    send(&app, "user_a", Some(&chat_id), "three").await;

    let (_, chat) = call(
        &app,
        Method::GET,
        &format!("/api/chats/{chat_id}?userId=user_a"),
        None,
    )
    .await;
    let contents: Vec<&str> = chat["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(
        contents,
        ["one", "echo: one", "two", "echo: two", "three", "echo: three"]
    );
}

#[tokio::test]
async fn history_lists_own_chats_newest_first_with_one_message() {
    let app = app(CannedModel::Echo);
    let (_, older) = send(&app, "user_a", None, "older").await;
    let (_, newer) = send(&app, "user_a", None, "newer").await;
    send(&app, "user_b", None, "not yours").await;

    let (status, history) = call(&app, Method::GET, "/api/history?userId=user_a", None).await;
    assert_eq!(status, StatusCode::OK);
    let chats = history.as_array().expect("array");
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0]["id"], newer["chatId"]);
    assert_eq!(chats[1]["id"], older["chatId"]);
    for chat in chats {
        assert_eq!(chat["messages"].as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn missing_user_id_is_a_bad_request() {
    let app = app(CannedModel::Echo);

    let (status, body) = call(&app, Method::GET, "/api/history", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User ID required");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({ "prompt": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_prompt_is_a_bad_request() {
    let app = app(CannedModel::Echo);
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({ "userId": "user_a", "chatId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn whitespace_prompt_is_a_bad_request() {
    let app = app(CannedModel::Echo);
    let (status, body) = send(&app, "user_a", None, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (_, history) = call(&app, Method::GET, "/api/history?userId=user_a", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn foreign_chat_is_not_found_for_every_operation() {
    let app = app(CannedModel::Echo);
    let (_, created) = send(&app, "owner", None, "private").await;
    let chat_id = created["chatId"].as_str().unwrap().to_string();
    let uri = format!("/api/chats/{chat_id}?userId=intruder");

    let (status, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Chat not found or unauthorized");

    let (status, _) = send(&app, "intruder", Some(&chat_id), "let me in").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still intact for the owner.
    let (status, chat) = call(
        &app,
        Method::GET,
        &format!("/api/chats/{chat_id}?userId=owner"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chat["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn padded_user_id_does_not_match_the_owner() {
    let app = app(CannedModel::Echo);
    let (_, created) = send(&app, "alice", None, "secret").await;
    let chat_id = created["chatId"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        Method::GET,
        &format!("/api/chats/{chat_id}?userId=%20alice%20"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, " alice", Some(&chat_id), "me too").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/chats/{chat_id}?userId=alice%20"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = call(&app, Method::GET, "/api/history?userId=%20alice", None).await;
    assert!(history.as_array().unwrap().is_empty());

    let (status, chat) = call(
        &app,
        Method::GET,
        &format!("/api/chats/{chat_id}?userId=alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chat["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_chat_id_is_not_found() {
    let app = app(CannedModel::Echo);
    let (status, _) = call(&app, Method::GET, "/api/chats/not-a-uuid?userId=u", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "u", Some("not-a-uuid"), "hi").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_chat_and_its_messages() {
    let app = app(CannedModel::Echo);
    let (_, created) = send(&app, "user_a", None, "temporary").await;
    let chat_id = created["chatId"].as_str().unwrap().to_string();
    let uri = format!("/api/chats/{chat_id}?userId=user_a");

    let (status, deleted) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], chat_id.as_str());
    assert!(deleted.get("messages").is_none());

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = call(&app, Method::GET, "/api/history?userId=user_a", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn provider_rate_limit_is_passed_through_as_429() {
    let app = app(CannedModel::RateLimited);
    let (status, body) = send(&app, "user_a", None, "hi").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["message"],
        "Too Many Requests: Groq API Limit Exceeded. Please try again later."
    );

    // The prompt was still recorded.
    let (_, history) = call(&app, Method::GET, "/api/history?userId=user_a", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn other_provider_failures_are_500() {
    let app = app(CannedModel::Broken);
    let (status, body) = send(&app, "user_a", None, "hi").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to generate response from AI");
}

#[tokio::test]
async fn health_reports_version_and_store() {
    let app = app(CannedModel::Echo);
    let (status, body) = call(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dbConnected"], true);
    assert_eq!(body["version"], parley_core::version());
    assert_eq!(body["model"], "llama-3.3-70b-versatile");
}
