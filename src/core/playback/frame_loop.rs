//! Cancellable periodic frame task.

use std::ops::ControlFlow;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs a callback on a fixed interval until cancelled or the callback breaks.
///
/// Cancelling is idempotent and also happens on drop. Once `cancel` returns, the
/// callback is never invoked again.
#[derive(Debug)]
pub struct FrameLoop {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameLoop {
    /// Spawn on the current tokio runtime.
    pub fn spawn<F>(interval: Duration, mut on_frame: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                if on_frame().is_break() {
                    flag.store(true, Ordering::Release);
                    break;
                }
            }
        });
        Self {
            cancelled,
            handle: Some(handle),
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
