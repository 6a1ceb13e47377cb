//! Background task plumbing for the tag input.
//!
//! Timers and suggestion fetches run as tokio tasks so the event loop never
//! blocks. Tasks never touch widget state: each one reports back by sending a
//! [`WidgetMessage`] through an unbounded channel that the owning widget
//! drains, either with `try_recv()` once per tick or by awaiting `recv()`.
//!
//! Every message carries the generation it was started under. The widget
//! compares that against its current generation to discard results that
//! belong to superseded input.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::api::{FetchError, SuggestionSource, Tag};

/// Messages sent from background tasks to the tag input.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetMessage {
    /// The debounce interval for `query` elapsed without further input.
    DebounceElapsed { query: String, generation: u64 },

    /// The suggestion source resolved for `query`.
    SuggestionsFetched {
        query: String,
        generation: u64,
        result: Result<Vec<Tag>, FetchError>,
    },
}

impl WidgetMessage {
    /// Get the generation this message was produced under.
    pub fn generation(&self) -> u64 {
        match self {
            WidgetMessage::DebounceElapsed { generation, .. }
            | WidgetMessage::SuggestionsFetched { generation, .. } => *generation,
        }
    }
}

/// Spawns background tasks that report to a single widget.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<WidgetMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<WidgetMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a timer that posts `DebounceElapsed` after `delay`.
    ///
    /// The returned handle may be aborted to cancel the timer.
    pub fn spawn_debounce(&self, query: String, generation: u64, delay: Duration) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(%query, generation, "Debounce timer fired");
            let _ = tx.send(WidgetMessage::DebounceElapsed { query, generation });
        })
    }

    /// Spawn a task that fetches suggestions for `query`.
    ///
    /// The source runs in its own task. If that task panics or is aborted, the
    /// widget still hears back, with [`FetchError::Cancelled`].
    pub fn spawn_fetch(&self, source: Arc<dyn SuggestionSource>, query: String, generation: u64) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let fetch_query = query.clone();
            let fetch = tokio::spawn(async move { source.fetch(&fetch_query).await });
            let result = match fetch.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(%query, error = %e, "Suggestion fetch task ended abnormally");
                    Err(FetchError::Cancelled)
                }
            };
            let _ = tx.send(WidgetMessage::SuggestionsFetched {
                query,
                generation,
                result,
            });
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver belongs to the widget;
/// the spawner is used to start its timers and fetches.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<WidgetMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}
