//! Mock chat backend for deterministic testing
//!
//! Implements [`ChatBackend`] by replaying scripted replies instead of
//! talking to a server, and captures every call for later assertions.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use agentops::backend::mock::{MockBackend, MockReply};
//! use agentops::chat::Message;
//!
//! let backend = Arc::new(MockBackend::new().with_chat_reply(MockReply::reply(
//!     "Tell me your skills",
//!     vec![Message::user("I'm looking for opportunity"), Message::assistant("Tell me your skills")],
//! )));
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::backend::client::ChatBackend;
use crate::backend::error::BackendError;
use crate::backend::wire::{ChatRequest, ChatResponse, FileUpload};
use crate::chat::{ConversationHistory, Message, SessionRole};

/// Type of error to simulate
#[derive(Clone, Debug)]
pub enum MockFailure {
    Timeout(u64),
    Status(u16),
    Decode(String),
}

impl MockFailure {
    fn into_backend_error(self) -> BackendError {
        match self {
            MockFailure::Timeout(ms) => BackendError::Timeout(ms),
            MockFailure::Status(status) => BackendError::Status {
                status,
                body: "mock failure".into(),
            },
            MockFailure::Decode(msg) => BackendError::Decode(msg),
        }
    }
}

/// One scripted answer to a chat call
#[derive(Clone, Debug)]
pub struct MockReply {
    pub result: Result<ChatResponse, MockFailure>,
    /// Time to wait before answering (simulates a slow backend)
    pub delay: Duration,
}

impl MockReply {
    pub fn reply(response: impl Into<String>, history: Vec<Message>) -> Self {
        Self {
            result: Ok(ChatResponse {
                response: response.into(),
                chat_history: ConversationHistory::new(history),
            }),
            delay: Duration::ZERO,
        }
    }

    pub fn failure(failure: MockFailure) -> Self {
        Self {
            result: Err(failure),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Mock backend for testing
///
/// Chat calls consume scripted replies in order. Once the script runs out
/// the mock echoes the prompt and appends the exchange to the request's
/// history, which is roughly what a real backend does.
#[derive(Default)]
pub struct MockBackend {
    chat_replies: Mutex<VecDeque<MockReply>>,
    warm_up_results: Mutex<VecDeque<Result<(), MockFailure>>>,
    warm_up_delay: Duration,
    fail_uploads: bool,
    fail_summaries: bool,
    captured_chats: Mutex<Vec<ChatRequest>>,
    captured_warm_ups: Mutex<Vec<SessionRole>>,
    captured_uploads: Mutex<Vec<FileUpload>>,
    captured_summaries: Mutex<Vec<ConversationHistory>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chat reply
    pub fn with_chat_reply(self, reply: MockReply) -> Self {
        self.chat_replies.lock().push_back(reply);
        self
    }

    /// Queue the outcome of the next warm-up call (default: success)
    pub fn with_warm_up_result(self, result: Result<(), MockFailure>) -> Self {
        self.warm_up_results.lock().push_back(result);
        self
    }

    /// Make every warm-up call take this long
    pub fn with_warm_up_delay(mut self, delay: Duration) -> Self {
        self.warm_up_delay = delay;
        self
    }

    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn failing_summaries(mut self) -> Self {
        self.fail_summaries = true;
        self
    }

    /// Queue a chat reply on an already shared mock
    pub fn push_chat_reply(&self, reply: MockReply) {
        self.chat_replies.lock().push_back(reply);
    }

    pub fn captured_chats(&self) -> Vec<ChatRequest> {
        self.captured_chats.lock().clone()
    }

    pub fn last_chat(&self) -> Option<ChatRequest> {
        self.captured_chats.lock().last().cloned()
    }

    pub fn captured_warm_ups(&self) -> Vec<SessionRole> {
        self.captured_warm_ups.lock().clone()
    }

    pub fn captured_uploads(&self) -> Vec<FileUpload> {
        self.captured_uploads.lock().clone()
    }

    pub fn captured_summaries(&self) -> Vec<ConversationHistory> {
        self.captured_summaries.lock().clone()
    }

    fn echo(request: &ChatRequest) -> ChatResponse {
        let reply = format!("echo: {}", request.prompt);
        let mut history = request.chat_history.messages().to_vec();
        history.push(Message::user(request.prompt.clone()));
        history.push(Message::assistant(reply.clone()));
        ChatResponse {
            response: reply,
            chat_history: ConversationHistory::new(history),
        }
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn warm_up(&self, role: SessionRole) -> Result<(), BackendError> {
        self.captured_warm_ups.lock().push(role);
        if self.warm_up_delay > Duration::ZERO {
            tokio::time::sleep(self.warm_up_delay).await;
        }
        let result = self.warm_up_results.lock().pop_front().unwrap_or(Ok(()));
        result.map_err(MockFailure::into_backend_error)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, BackendError> {
        self.captured_chats.lock().push(request.clone());
        let scripted = self.chat_replies.lock().pop_front();

        match scripted {
            Some(reply) => {
                if reply.delay > Duration::ZERO {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result.map_err(MockFailure::into_backend_error)
            }
            None => Ok(Self::echo(&request)),
        }
    }

    async fn upload(&self, file: FileUpload) -> Result<Value, BackendError> {
        let name = file.file_name.clone();
        self.captured_uploads.lock().push(file);
        if self.fail_uploads {
            return Err(MockFailure::Status(500).into_backend_error());
        }
        Ok(json!({"status": "uploaded", "file": name}))
    }

    async fn summarize(&self, history: ConversationHistory) -> Result<Value, BackendError> {
        let count = history.len();
        self.captured_summaries.lock().push(history);
        if self.fail_summaries {
            return Err(MockFailure::Status(500).into_backend_error());
        }
        Ok(json!({"status": "created", "messages": count}))
    }
}
