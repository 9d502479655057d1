use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::backend::{ChatBackend, FileUpload};
use crate::chat::{Message, Preset, SessionRole, UiMode};
use crate::config::Config;
use crate::session::gate::InitGate;
use crate::session::state::Session;
use crate::session::sync::{ChatOutcome, ChatSync};

/// Top-level state machine driven by user actions.
///
/// Every action mutates the transcript synchronously and then hands any
/// network work to the chat queue or a detached task. Cheap to clone; all
/// clones drive the same session.
#[derive(Clone)]
pub struct WorkflowController {
    session: Arc<Session>,
    backend: Arc<dyn ChatBackend>,
    gate: Arc<InitGate>,
    sync: Arc<ChatSync>,
    config: Arc<Config>,
}

impl WorkflowController {
    /// Start a fresh session. Must be called inside a tokio runtime.
    pub fn new(backend: Arc<dyn ChatBackend>, config: &Config) -> Self {
        let session = Arc::new(Session::new(config.greeting.clone()));
        let gate = Arc::new(InitGate::new());
        let sync = ChatSync::spawn(session.clone(), backend.clone(), gate.clone());

        tracing::debug!(session = %session.id(), "Session started");

        Self {
            session,
            backend,
            gate,
            sync: Arc::new(sync),
            config: Arc::new(config.clone()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn gate(&self) -> &InitGate {
        &self.gate
    }

    /// True while a chat exchange is queued or in flight
    pub fn is_loading(&self) -> bool {
        self.sync.is_loading()
    }

    /// Whether the send control should be enabled
    pub fn can_send(&self) -> bool {
        self.session.mode() == UiMode::FreeForm && !self.is_loading()
    }

    pub async fn choose(&self, preset: Preset) -> ChatOutcome {
        self.select_preset(preset.prompt(), preset.role()).await
    }

    /// Start (or restart) the conversation with a preset.
    ///
    /// Accepted in any mode. Sets the session role, switches to free-form
    /// input and, for warm-up roles not yet initialized, builds the search
    /// index before chatting. A failed warm-up does not block the chat.
    pub async fn select_preset(&self, prompt: impl Into<String>, role: SessionRole) -> ChatOutcome {
        let prompt = prompt.into();
        let warm_up = self.config.requires_warmup(role).then_some(role);

        let outcome = self.session.with_state(|state| {
            state.log.push(Message::user(prompt.clone()));
            if let Some(previous) = state.role.filter(|previous| *previous != role) {
                tracing::info!(
                    session = %self.session.id(),
                    from = %previous,
                    to = %role,
                    "Session role changed mid-conversation"
                );
            }
            state.role = Some(role);
            state.mode = UiMode::FreeForm;
            self.sync.enqueue(Some(role), prompt, warm_up)
        });

        outcome.await.unwrap_or(ChatOutcome::Failed)
    }

    /// Send free text with the current role. Blank text is ignored.
    pub async fn send_freeform(&self, text: &str) -> ChatOutcome {
        if text.trim().is_empty() {
            return ChatOutcome::Skipped;
        }

        let outcome = self.session.with_state(|state| {
            state.log.push(Message::user(text));
            state.input.clear();
            self.sync.enqueue(state.role, text.to_string(), None)
        });

        outcome.await.unwrap_or(ChatOutcome::Failed)
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.session.set_input(text);
    }

    /// Send whatever is in the input buffer
    pub async fn submit_input(&self) -> ChatOutcome {
        let text = self.session.input();
        self.send_freeform(&text).await
    }

    /// Ask the backend to summarize the conversation into an opportunity.
    ///
    /// Runs detached; the session is never touched. The handle resolves to
    /// the raw response, or `None` if the call failed.
    pub fn request_summary(&self) -> JoinHandle<Option<Value>> {
        let backend = self.backend.clone();
        let history = self.session.history();
        let session_id = self.session.id();

        tokio::spawn(async move {
            match backend.summarize(history).await {
                Ok(value) => {
                    tracing::info!(session = %session_id, response = %value, "Summary requested");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!(session = %session_id, error = %e, "Summary request failed");
                    None
                }
            }
        })
    }

    /// Upload a file. Runs detached; the session is never touched.
    pub fn upload_file(&self, path: impl Into<PathBuf>) -> JoinHandle<Option<Value>> {
        let backend = self.backend.clone();
        let path = path.into();
        let session_id = self.session.id();

        tokio::spawn(async move {
            let file = match FileUpload::read(&path).await {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!(
                        session = %session_id,
                        path = %path.display(),
                        error = %e,
                        "Failed to read upload"
                    );
                    return None;
                }
            };

            match backend.upload(file).await {
                Ok(ack) => {
                    tracing::info!(session = %session_id, path = %path.display(), ack = %ack, "File uploaded");
                    Some(ack)
                }
                Err(e) => {
                    tracing::warn!(session = %session_id, path = %path.display(), error = %e, "File upload failed");
                    None
                }
            }
        })
    }
}
