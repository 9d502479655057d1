//! Chat exchange with the backend and reconciliation of its history.
//!
//! Exchanges are queued per session and dispatched one at a time by a
//! worker task, in the order they were issued. Each one carries a sequence
//! number and a response is only adopted when it is newer than the last
//! one applied, so history can never move backwards.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::backend::{BackendError, ChatBackend, ChatRequest, ChatResponse};
use crate::chat::{Message, SessionRole};
use crate::session::gate::InitGate;
use crate::session::state::{Session, SessionState};

/// How a chat action resolved. Never an error: failures are only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The assistant answered; the reply was appended to the transcript
    Replied(String),
    /// Transport or decoding failure; transcript keeps the user message
    Failed,
    /// A newer response was already applied; this one was dropped
    Discarded,
    /// Nothing was sent (blank input)
    Skipped,
}

impl ChatOutcome {
    pub fn is_replied(&self) -> bool {
        matches!(self, ChatOutcome::Replied(_))
    }
}

/// Counts one queued or in-flight exchange for as long as it lives
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A queued exchange
struct ChatJob {
    seq: u64,
    role: Option<SessionRole>,
    prompt: String,
    /// Role to warm up before the exchange, if any
    warm_up: Option<SessionRole>,
    reply: oneshot::Sender<ChatOutcome>,
    pending: PendingGuard,
}

/// Per-session chat dispatcher
pub struct ChatSync {
    queue: mpsc::UnboundedSender<ChatJob>,
    next_seq: AtomicU64,
    pending: Arc<AtomicUsize>,
}

impl ChatSync {
    /// Start the dispatch worker. Must be called inside a tokio runtime.
    pub fn spawn(session: Arc<Session>, backend: Arc<dyn ChatBackend>, gate: Arc<InitGate>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(run_worker(rx, session, backend, gate));

        Self {
            queue: tx,
            next_seq: AtomicU64::new(0),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// True while any exchange is queued or in flight
    pub fn is_loading(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Queue an exchange. Call this while holding the session state lock
    /// that appended the user message, so transcript order and dispatch
    /// order agree.
    pub(crate) fn enqueue(
        &self,
        role: Option<SessionRole>,
        prompt: String,
        warm_up: Option<SessionRole>,
    ) -> oneshot::Receiver<ChatOutcome> {
        let (reply, outcome) = oneshot::channel();
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let job = ChatJob {
            seq,
            role,
            prompt,
            warm_up,
            reply,
            pending: PendingGuard::new(&self.pending),
        };
        if let Err(mpsc::error::SendError(job)) = self.queue.send(job) {
            tracing::warn!(seq = job.seq, "Chat worker is gone, dropping request");
            let ChatJob { reply, pending, .. } = job;
            drop(pending);
            let _ = reply.send(ChatOutcome::Failed);
        }
        outcome
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<ChatJob>,
    session: Arc<Session>,
    backend: Arc<dyn ChatBackend>,
    gate: Arc<InitGate>,
) {
    while let Some(job) = rx.recv().await {
        let ChatJob {
            seq,
            role,
            prompt,
            warm_up,
            reply,
            pending,
        } = job;

        // A panicking backend only fails this exchange, not the queue
        let handle = tokio::spawn(exchange(
            session.clone(),
            backend.clone(),
            gate.clone(),
            seq,
            role,
            prompt,
            warm_up,
        ));
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    session = %session.id(),
                    seq,
                    error = %e,
                    "Chat exchange aborted"
                );
                ChatOutcome::Failed
            }
        };

        drop(pending);
        // Caller may have stopped waiting
        let _ = reply.send(outcome);
    }
    tracing::debug!(session = %session.id(), "Chat worker stopped");
}

async fn exchange(
    session: Arc<Session>,
    backend: Arc<dyn ChatBackend>,
    gate: Arc<InitGate>,
    seq: u64,
    role: Option<SessionRole>,
    prompt: String,
    warm_up: Option<SessionRole>,
) -> ChatOutcome {
    if let Some(warm_role) = warm_up {
        // Best effort: chatting goes ahead even if indexing failed
        gate.ensure_initialized(backend.as_ref(), warm_role).await;
    }

    let request = ChatRequest {
        user: role,
        prompt,
        chat_history: session.history(),
    };
    tracing::debug!(
        session = %session.id(),
        seq,
        role = ?role,
        history_len = request.chat_history.len(),
        "Dispatching chat request"
    );

    let result = backend.chat(request).await;
    reconcile(&session, seq, result)
}

/// Fold one exchange result into the session
pub(crate) fn reconcile(
    session: &Session,
    seq: u64,
    result: Result<ChatResponse, BackendError>,
) -> ChatOutcome {
    match result {
        Ok(response) => session.with_state(|state| apply_response(state, session, seq, response)),
        Err(e) => {
            tracing::warn!(
                session = %session.id(),
                seq,
                error = %e,
                "Chat request failed"
            );
            ChatOutcome::Failed
        }
    }
}

fn apply_response(
    state: &mut SessionState,
    session: &Session,
    seq: u64,
    response: ChatResponse,
) -> ChatOutcome {
    if seq <= state.last_applied_seq {
        tracing::warn!(
            session = %session.id(),
            seq,
            applied = state.last_applied_seq,
            "Discarding stale chat response"
        );
        return ChatOutcome::Discarded;
    }

    state.last_applied_seq = seq;
    state.log.push(Message::assistant(response.response.clone()));
    state.history = response.chat_history;
    ChatOutcome::Replied(response.response)
}
