use async_trait::async_trait;
use serde_json::Value;

use crate::backend::error::BackendError;
use crate::backend::wire::{ChatRequest, ChatResponse, FileUpload};
use crate::chat::{ConversationHistory, SessionRole};

/// Remote chat service consumed by the session orchestrator
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// One-time search index warm-up for a role. `Ok` means a 2xx answer.
    async fn warm_up(&self, role: SessionRole) -> Result<(), BackendError>;

    /// Exchange a prompt for a reply and the authoritative history
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, BackendError>;

    /// Submit a file as a multipart payload; the acknowledgement is opaque
    async fn upload(&self, file: FileUpload) -> Result<Value, BackendError>;

    /// Ask for a summary of the conversation; the response is opaque
    async fn summarize(&self, history: ConversationHistory) -> Result<Value, BackendError>;
}
