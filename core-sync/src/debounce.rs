//! Single-slot debounce timer
//!
//! Coalesces a burst of triggers into one delayed action: scheduling aborts
//! any unfired timer and restarts the window, so only the state captured by
//! the final trigger is acted on (pure debounce, not throttle). One slot
//! per sink; the coordinator owns the slots and cancels them on teardown
//! without flushing.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct DebounceSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run after `window`, cancelling any pending
    /// unfired action on this slot.
    ///
    /// The action future must capture the full state it intends to write at
    /// schedule time — writes carry complete snapshots, never deltas, so an
    /// aborted-but-already-running predecessor is harmless.
    pub async fn schedule<F>(&self, window: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            action.await;
        });

        let mut guard = self.handle.lock().await;
        if let Some(previous) = guard.replace(task) {
            previous.abort();
        }
    }

    /// Cancel any pending action without flushing.
    pub async fn cancel(&self) {
        if let Some(task) = self.handle.lock().await.take() {
            task.abort();
        }
    }

    /// Whether a timer is currently pending (or its action still running).
    pub async fn is_pending(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }
}
