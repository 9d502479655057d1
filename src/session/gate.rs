use std::collections::HashSet;

use parking_lot::Mutex;

use crate::backend::ChatBackend;
use crate::chat::SessionRole;

/// Guards the one-time index warm-up, keyed per role.
///
/// A role is marked initialized only after the backend confirmed success,
/// so a failed attempt is retried on the next qualifying call. Attempts are
/// single-flight: concurrent callers wait for the one in progress.
#[derive(Debug, Default)]
pub struct InitGate {
    initialized: Mutex<HashSet<SessionRole>>,
    flight: tokio::sync::Mutex<()>,
}

impl InitGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self, role: SessionRole) -> bool {
        self.initialized.lock().contains(&role)
    }

    /// Warm up `role` unless that already succeeded. Returns whether the
    /// role is initialized afterwards. Failures are logged, never raised.
    pub async fn ensure_initialized(&self, backend: &dyn ChatBackend, role: SessionRole) -> bool {
        if self.is_initialized(role) {
            return true;
        }

        let _flight = self.flight.lock().await;
        // Another caller may have finished while we waited
        if self.is_initialized(role) {
            return true;
        }

        match backend.warm_up(role).await {
            Ok(()) => {
                self.initialized.lock().insert(role);
                tracing::info!(role = %role, "Search index warm-up succeeded");
                true
            }
            Err(e) => {
                tracing::warn!(role = %role, error = %e, "Search index warm-up failed");
                false
            }
        }
    }
}
