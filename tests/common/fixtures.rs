//! Transcript fixtures

#![allow(dead_code)]

use std::sync::Arc;

use agentops::backend::mock::{MockBackend, MockReply};
use agentops::{Config, Message, WorkflowController};

pub const GREETING: &str = "Hi! How can I help you today?";
pub const LOOKING: &str = "I'm looking for opportunity";

/// History the backend returns after the first "looking for opportunity" turn
pub fn looking_history() -> Vec<Message> {
    vec![
        Message::user(LOOKING),
        Message::assistant("Tell me your skills"),
    ]
}

pub fn looking_reply() -> MockReply {
    MockReply::reply("Tell me your skills", looking_history())
}

/// Controller over a shared mock, with the default config
pub fn controller(backend: &Arc<MockBackend>) -> WorkflowController {
    WorkflowController::new(backend.clone(), &Config::default())
}
