use parking_lot::Mutex;
use uuid::Uuid;

use crate::chat::{ConversationHistory, Message, MessageLog, SessionRole, UiMode};

/// Mutable conversation state of one session
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) log: MessageLog,
    pub(crate) history: ConversationHistory,
    pub(crate) role: Option<SessionRole>,
    pub(crate) mode: UiMode,
    pub(crate) input: String,
    /// Sequence number of the last chat response adopted into `history`
    pub(crate) last_applied_seq: u64,
}

/// One conversation, from page load to teardown. Nothing here is persisted.
///
/// State sits behind a synchronous lock that is never held across an await.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    state: Mutex<SessionState>,
}

impl Session {
    /// Start a session whose transcript holds only the assistant greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: Mutex::new(SessionState {
                log: MessageLog::with_greeting(greeting),
                history: ConversationHistory::default(),
                role: None,
                mode: UiMode::Preset,
                input: String::new(),
                last_applied_seq: 0,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Snapshot of the displayed transcript
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().log.messages().to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().log.len()
    }

    /// Snapshot of the backend-authoritative history
    pub fn history(&self) -> ConversationHistory {
        self.state.lock().history.clone()
    }

    pub fn role(&self) -> Option<SessionRole> {
        self.state.lock().role
    }

    pub fn mode(&self) -> UiMode {
        self.state.lock().mode
    }

    /// Pending text in the input box
    pub fn input(&self) -> String {
        self.state.lock().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.state.lock().input = text.into();
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.state.lock())
    }
}
