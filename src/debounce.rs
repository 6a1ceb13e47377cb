//! Single-timer debounce controller.
//!
//! At most one timer is pending at any time. Arming a new timer aborts the
//! previous one, so only the most recent query ever reaches the suggestion
//! source. Dropping the controller cancels whatever is pending.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

use crate::tasks::TaskSpawner;

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Debounce controller owning the pending timer of one widget.
pub struct Debouncer {
    /// The quiet interval required before a fetch fires.
    delay: Duration,
    /// The currently armed timer, if any.
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a new debouncer with the given interval.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Arm the timer for `query`, replacing any pending one.
    pub fn schedule(&mut self, spawner: &TaskSpawner, query: String, generation: u64) {
        self.cancel();
        trace!(%query, generation, delay_ms = self.delay.as_millis() as u64, "Arming debounce timer");
        self.pending = Some(spawner.spawn_debounce(query, generation, self.delay));
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Forget a timer that has already fired.
    pub(crate) fn mark_fired(&mut self) {
        self.pending = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}
