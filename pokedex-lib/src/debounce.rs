//! Cancellable quiescence timer.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Runs an action once no newer action has been scheduled for `window`.
///
/// Each [`schedule`](Self::schedule) aborts the previously scheduled
/// action, whether it is still waiting out its window or already running.
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `action` after the window, replacing any earlier action.
    ///
    /// The deadline is fixed when this is called, not when the task first
    /// runs. Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let quiet = tokio::time::sleep(self.window);
        let handle = tokio::spawn(async move {
            quiet.await;
            action.await;
        });
        if let Some(previous) = self.pending().replace(handle) {
            previous.abort();
        }
    }

    /// Abort the scheduled action. Returns whether one was still pending.
    pub fn cancel(&self) -> bool {
        match self.pending().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// An action is waiting out its window or running.
    pub fn is_pending(&self) -> bool {
        self.pending().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter_action(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_window() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            debouncer.schedule(counter_action(&fired));
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_fire_before_window() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_action(&fired));
        tokio::time::advance(Duration::from_millis(299)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_action(&fired));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(50));
            debouncer.schedule(counter_action(&fired));
        }
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
