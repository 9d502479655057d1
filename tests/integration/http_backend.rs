//! Integration tests for the HTTP backend client
//!
//! Runs `HttpBackend` against an axum fake of the chat service and checks
//! the JSON and multipart bodies it sends and how it maps failures.

use std::sync::Arc;
use std::time::Duration;

use agentops::backend::{ChatRequest, FileUpload};
use agentops::config::BackendConfig;
use agentops::{
    BackendError, ChatBackend, ChatOutcome, Config, ConversationHistory, HttpBackend, Message,
    SessionRole, WorkflowController,
};
use axum::http::StatusCode;
use serde_json::json;

use super::common::fake_backend::{Behavior, ChatBehavior, FakeBackend};
use super::common::fixtures::LOOKING;

fn http_backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(BackendConfig {
        base_url: base_url.to_string(),
        ..BackendConfig::default()
    })
    .expect("build client")
}

#[tokio::test]
async fn test_chat_posts_expected_body_and_decodes_reply() {
    let fake = FakeBackend::spawn(Behavior::default()).await;
    let backend = http_backend(&fake.base_url);

    let response = backend
        .chat(ChatRequest {
            user: Some(SessionRole::Staff),
            prompt: "JavaScript".into(),
            chat_history: ConversationHistory::new(vec![
                Message::user(LOOKING),
                Message::assistant("Tell me your skills"),
            ]),
        })
        .await
        .expect("chat succeeds");

    assert_eq!(response.response, "echo: JavaScript");
    assert_eq!(response.chat_history.len(), 4);

    let chats = fake.recorded.chats.lock().clone();
    assert_eq!(
        chats,
        vec![json!({
            "user": "staff",
            "prompt": "JavaScript",
            "chat_history": [
                {"role": "user", "content": LOOKING},
                {"role": "assistant", "content": "Tell me your skills"},
            ],
        })]
    );
}

#[tokio::test]
async fn test_warm_up_sends_role_and_maps_status() {
    let fake = FakeBackend::spawn(Behavior::default()).await;
    http_backend(&fake.base_url)
        .warm_up(SessionRole::Staff)
        .await
        .expect("warm-up succeeds");

    let warm_ups = fake.recorded.warm_ups.lock().clone();
    assert_eq!(warm_ups.len(), 1);
    assert_eq!(warm_ups[0].get("user").map(String::as_str), Some("staff"));

    let failing = FakeBackend::spawn(Behavior {
        warm_up_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..Behavior::default()
    })
    .await;
    let err = http_backend(&failing.base_url)
        .warm_up(SessionRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_chat_error_status_and_malformed_body() {
    let unavailable = FakeBackend::spawn(Behavior {
        chat: ChatBehavior::Status(StatusCode::SERVICE_UNAVAILABLE),
        ..Behavior::default()
    })
    .await;
    let request = ChatRequest {
        user: None,
        prompt: "hello".into(),
        chat_history: ConversationHistory::default(),
    };

    let err = http_backend(&unavailable.base_url)
        .chat(request.clone())
        .await
        .unwrap_err();
    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("backend unavailable"));
        }
        other => panic!("Expected Status error, got {:?}", other),
    }

    let malformed = FakeBackend::spawn(Behavior {
        chat: ChatBehavior::Malformed,
        ..Behavior::default()
    })
    .await;
    let err = http_backend(&malformed.base_url)
        .chat(request)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let fake = FakeBackend::spawn(Behavior {
        chat: ChatBehavior::Slow(Duration::from_secs(2)),
        ..Behavior::default()
    })
    .await;
    let backend = HttpBackend::new(BackendConfig {
        base_url: fake.base_url.clone(),
        timeout: Duration::from_millis(100),
        ..BackendConfig::default()
    })
    .unwrap();

    let err = backend
        .chat(ChatRequest {
            user: None,
            prompt: "hello".into(),
            chat_history: ConversationHistory::default(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Timeout(100)));
}

#[tokio::test]
async fn test_upload_sends_single_file_part() {
    let fake = FakeBackend::spawn(Behavior::default()).await;
    let backend = http_backend(&fake.base_url);

    let ack = backend
        .upload(FileUpload::new("skills.csv", b"name,skill\n".to_vec()))
        .await
        .expect("upload succeeds");
    assert_eq!(ack["message"], "File uploaded");

    let uploads = fake.recorded.uploads.lock().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].name, "file");
    assert_eq!(uploads[0].file_name, "skills.csv");
    assert_eq!(uploads[0].content_type, "text/csv");
    assert_eq!(uploads[0].bytes, b"name,skill\n");
}

#[tokio::test]
async fn test_summarize_posts_history() {
    let fake = FakeBackend::spawn(Behavior::default()).await;
    let backend = http_backend(&fake.base_url);

    let value = backend
        .summarize(ConversationHistory::new(vec![Message::user("Need a Rust dev")]))
        .await
        .unwrap();

    assert_eq!(value, json!({"opportunity_id": 42}));
    assert_eq!(
        fake.recorded.summaries.lock().clone(),
        vec![json!({"chat_history": [{"role": "user", "content": "Need a Rust dev"}]})]
    );
}

#[tokio::test]
async fn test_controller_over_http() {
    let fake = FakeBackend::spawn(Behavior::default()).await;
    let config = Config::default().with_base_url(fake.base_url.clone());
    let backend = Arc::new(HttpBackend::new(config.backend.clone()).unwrap());
    let controller = WorkflowController::new(backend, &config);

    let outcome = controller.select_preset(LOOKING, SessionRole::Staff).await;
    assert_eq!(outcome, ChatOutcome::Replied(format!("echo: {LOOKING}")));
    controller.send_freeform("JavaScript").await;

    assert_eq!(fake.recorded.warm_ups.lock().len(), 1);
    let chats = fake.recorded.chats.lock().clone();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[1]["chat_history"].as_array().map(Vec::len), Some(2));
    assert_eq!(controller.session().history().len(), 4);
    assert_eq!(controller.session().message_count(), 5);
}

#[tokio::test]
async fn test_unreachable_backend_fails_quietly() {
    // Nothing listens on the discard port
    let config = Config::default().with_base_url("http://127.0.0.1:9");
    let backend = Arc::new(HttpBackend::new(config.backend.clone()).unwrap());
    let controller = WorkflowController::new(backend, &config);

    let outcome = controller.select_preset(LOOKING, SessionRole::Staff).await;

    assert_eq!(outcome, ChatOutcome::Failed);
    assert!(!controller.gate().is_initialized(SessionRole::Staff));
    assert_eq!(controller.session().message_count(), 2);
    assert!(controller.session().history().is_empty());
}
