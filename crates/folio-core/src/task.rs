//! Cancellable background loops.
//!
//! The page animations run "forever", but every loop here takes a
//! [`CancellationToken`] and checks it at each suspension point so the
//! controller (or a test) can tear it down.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Sleep for `duration` unless `cancel` fires first.
///
/// Returns `true` if the full duration elapsed, `false` if cancelled.
pub async fn sleep_or_cancel(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Handle to a spawned animation loop.
#[derive(Debug)]
pub struct LoopHandle {
    name: &'static str,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl LoopHandle {
    /// Spawn `fut` on the current runtime under a child of `parent`.
    ///
    /// The future receives its own token; cancelling `parent` cancels it too.
    pub fn spawn<F, Fut>(name: &'static str, parent: &CancellationToken, f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel = parent.child_token();
        let join = tokio::spawn(f(cancel.clone()));
        debug!(loop_name = name, "Animation loop started");
        Self { name, cancel, join }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.join.await {
            tracing::warn!(loop_name = self.name, "Animation loop ended abnormally: {}", e);
        }
        debug!(loop_name = self.name, "Animation loop stopped");
    }
}
