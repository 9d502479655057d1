pub mod backend;
pub mod chat;
pub mod config;
pub mod session;
pub mod util;

pub use backend::{BackendError, ChatBackend, HttpBackend};
pub use chat::{ConversationHistory, Message, MessageLog, MessageRole, Preset, SessionRole, UiMode};
pub use config::Config;
pub use session::{ChatOutcome, InitGate, Session, WorkflowController};
pub use util::UserProfile;
