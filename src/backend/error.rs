use thiserror::Error;

/// Failure talking to the chat backend.
///
/// Every variant is transient: callers log it and carry on.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request timed out after {0}ms")]
    Timeout(u64),
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Map a reqwest error, folding timeouts into [`BackendError::Timeout`]
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            BackendError::Timeout(timeout_ms)
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err)
        }
    }
}
