mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use docbot::api::build_app;
use docbot::api::types::ApiResponse;
use docbot::api::types::AskResponse;
use docbot::api::types::HealthResponse;
use docbot::api::AppState;
use docbot::api::SessionManager;
use docbot::rag::ConversationalRetrievalChain;
use docbot::rag::MessageType;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

fn app(chain: Arc<ConversationalRetrievalChain>) -> Router {
    build_app(
        AppState {
            chain,
            sessions: Arc::new(SessionManager::default()),
        },
        false,
    )
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send<T: DeserializeOwned>(app: &Router, request: Request<Body>) -> (StatusCode, T) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_ask_returns_answer_and_history() {
    let (model, chain) = common::echo_chain();
    let app = app(chain);

    let (status, body): (_, AskResponse) =
        send(&app, post_json("/ask/", r#"{"content":"How long do refunds take?"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.answer, "reply 0: How long do refunds take?");
    assert_eq!(body.chat_history.len(), 2);
    assert_eq!(body.chat_history[0].message_type, MessageType::Human);
    assert_eq!(body.chat_history[0].content, "How long do refunds take?");
    assert_eq!(body.chat_history[1].message_type, MessageType::Ai);
    assert!(body.time_taken >= 0.0);
    assert!(body.session_id.is_none());
    // No history yet, so no condense call
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_ask_response_json_shape() {
    let (_model, chain) = common::echo_chain();
    let app = app(chain);

    let (status, body): (_, serde_json::Value) =
        send(&app, post_json("/ask/", r#"{"content":"hi"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["answer"].is_string());
    assert!(body["time_taken"].is_number());
    assert_eq!(body["chat_history"][0]["type"], "human");
    assert_eq!(body["chat_history"][1]["type"], "ai");
    assert!(body.get("session_id").is_none());
}

#[tokio::test]
async fn test_ask_without_trailing_slash() {
    let (_model, chain) = common::echo_chain();
    let app = app(chain);

    let (status, _body): (_, AskResponse) =
        send(&app, post_json("/ask", r#"{"content":"hi"}"#)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_requests_without_session_are_independent() {
    let (model, chain) = common::echo_chain();
    let app = app(chain);

    for _ in 0..2 {
        let (status, body): (_, AskResponse) =
            send(&app, post_json("/ask/", r#"{"content":"hello"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.chat_history.len(), 2);
    }
    assert_eq!(model.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_session_accumulates_history() {
    let (model, chain) = common::echo_chain();
    let app = app(chain);

    let first = r#"{"content":"What is the refund window?","session_id":"abc"}"#;
    let second = r#"{"content":"And for support?","session_id":"abc"}"#;

    let (_, body): (_, AskResponse) = send(&app, post_json("/ask/", first)).await;
    assert_eq!(body.chat_history.len(), 2);
    assert_eq!(body.session_id.as_deref(), Some("abc"));

    let (status, body): (_, AskResponse) = send(&app, post_json("/ask/", second)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.chat_history.len(), 4);
    assert_eq!(body.chat_history[2].content, "And for support?");

    // answer, then condense + answer
    assert_eq!(model.calls.load(Ordering::SeqCst), 3);
    let prompts = model.prompts.lock().unwrap();
    let condense = &prompts[1][0].content;
    assert!(condense.contains("Human: What is the refund window?"));
    assert!(condense.contains("Follow Up Input: And for support?"));
}

#[tokio::test]
async fn test_missing_content_is_unprocessable() {
    let (model, chain) = common::echo_chain();
    let app = app(chain);

    for body in [r#"{}"#, r#"{"content":"   "}"#, r#"{"content":42}"#, "not json"] {
        let (status, response): (_, ApiResponse<()>) =
            send(&app, post_json("/ask/", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {body}");
        assert!(!response.success);
        assert!(response.error.is_some());
    }
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chain_failure_is_server_error() {
    let app = app(common::failing_chain());

    let (status, response): (_, ApiResponse<()>) =
        send(&app, post_json("/ask/", r#"{"content":"hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.success);
    assert!(response.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_health() {
    let (_model, chain) = common::echo_chain();
    let app = app(chain);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, response): (_, ApiResponse<HealthResponse>) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response.success);
    let health = response.data.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.active_sessions, 0);
}
