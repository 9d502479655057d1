//! Conversational session orchestration.
//!
//! - [`Session`]: transcript, history, role and input mode of one conversation
//! - [`InitGate`]: one-time search index warm-up per role
//! - [`ChatSync`]: serialized chat exchange and history reconciliation
//! - [`WorkflowController`]: entry point for user actions

mod controller;
mod gate;
mod state;
mod sync;

pub use controller::WorkflowController;
pub use gate::InitGate;
pub use state::Session;
pub use sync::{ChatOutcome, ChatSync};
