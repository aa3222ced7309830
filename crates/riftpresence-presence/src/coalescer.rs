//! Update coalescing
//!
//! Client events arrive in bursts (one lobby change fans out into several
//! topic events). The coalescer debounces: the first notification opens a
//! fixed window, later ones land in the already-open window, and exactly one
//! push happens when it closes. The window never extends.

use crate::updater::PresencePush;
use riftpresence_core::{MergeNotifier, COALESCE_WINDOW};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

pub struct UpdateCoalescer {
    window: Duration,
    pending: Arc<AtomicBool>,
    sink: Arc<dyn PresencePush>,
}

impl UpdateCoalescer {
    pub fn new(sink: Arc<dyn PresencePush>) -> Self {
        Self::with_window(sink, COALESCE_WINDOW)
    }

    pub fn with_window(sink: Arc<dyn PresencePush>, window: Duration) -> Self {
        Self {
            window,
            pending: Arc::new(AtomicBool::new(false)),
            sink,
        }
    }
}

impl MergeNotifier for UpdateCoalescer {
    /// Must be called from within the runtime. Returns immediately; the
    /// push happens on a spawned timer task.
    fn notify(&self) {
        if self.pending.swap(true, Ordering::SeqCst) {
            trace!("Merge window already open");
            return;
        }
        let pending = self.pending.clone();
        let sink = self.sink.clone();
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // Clear before pushing so merges racing the push open a fresh
            // window instead of being lost
            pending.store(false, Ordering::SeqCst);
            sink.push().await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU32;

    struct CountingSink {
        pushes: AtomicU32,
    }

    #[async_trait]
    impl PresencePush for CountingSink {
        async fn push(&self) {
            self.pushes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting() -> Arc<CountingSink> {
        Arc::new(CountingSink {
            pushes: AtomicU32::new(0),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_notifications_yields_one_push() {
        let sink = counting();
        let coalescer = UpdateCoalescer::with_window(sink.clone(), Duration::from_secs(1));

        for _ in 0..10 {
            coalescer.notify();
        }
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(sink.pushes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn window_does_not_extend() {
        let sink = counting();
        let coalescer = UpdateCoalescer::with_window(sink.clone(), Duration::from_secs(1));

        coalescer.notify();
        // A late notification inside the window must not restart the timer
        tokio::time::sleep(Duration::from_millis(900)).await;
        coalescer.notify();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(sink.pushes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_periods_separate_pushes() {
        let sink = counting();
        let coalescer = UpdateCoalescer::with_window(sink.clone(), Duration::from_secs(1));

        coalescer.notify();
        tokio::time::sleep(Duration::from_secs(2)).await;
        coalescer.notify();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(sink.pushes.load(Ordering::SeqCst), 2);
    }
}
