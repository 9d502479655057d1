//! Conversation data model: messages, transcripts and session roles.

pub mod message;
pub mod role;

pub use message::{ConversationHistory, Message, MessageLog, MessageRole};
pub use role::{Preset, SessionRole, UiMode, UnknownRole};
