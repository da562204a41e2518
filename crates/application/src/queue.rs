//! Rate-limited serial request queue
//!
//! Tasks run one at a time on a background worker, with a minimum
//! spacing between consecutive dispatches. The spacing wait happens
//! while the task is still queued, so a `clear` during the wait
//! discards it before it runs. Task errors are logged and swallowed;
//! one failing task never stalls the queue.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use crate::error::ApplicationError;

type QueueTask = Pin<Box<dyn Future<Output = Result<(), ApplicationError>> + Send>>;

const DEFAULT_MIN_SPACING: Duration = Duration::from_millis(1000);

struct QueueInner {
    pending: Mutex<VecDeque<QueueTask>>,
    notify: Notify,
    closed: AtomicBool,
    min_spacing: Duration,
}

impl QueueInner {
    fn lock_pending(&self) -> std::sync::MutexGuard<'_, VecDeque<QueueTask>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serializes request tasks with a minimum spacing between dispatches.
pub struct RequestQueue {
    inner: Arc<QueueInner>,
}

impl RequestQueue {
    /// Creates a queue with the given spacing and starts its worker.
    #[must_use]
    pub fn new(min_spacing: Duration) -> Self {
        let inner = Arc::new(QueueInner {
            pending: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
            min_spacing,
        });
        tokio::spawn(worker(Arc::clone(&inner)));
        Self { inner }
    }

    /// Creates a queue with the standard 1000ms spacing.
    #[must_use]
    pub fn with_default_spacing() -> Self {
        Self::new(DEFAULT_MIN_SPACING)
    }

    /// Enqueues a task for serial execution.
    pub fn enqueue<F>(&self, task: F)
    where
        F: Future<Output = Result<(), ApplicationError>> + Send + 'static,
    {
        self.inner.lock_pending().push_back(Box::pin(task));
        self.inner.notify.notify_one();
    }

    /// Discards all tasks that have not yet been dispatched.
    pub fn clear(&self) {
        self.inner.lock_pending().clear();
    }

    /// Number of tasks waiting to be dispatched.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.lock_pending().len()
    }
}

impl Drop for RequestQueue {
    fn drop(&mut self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.notify.notify_one();
    }
}

async fn worker(inner: Arc<QueueInner>) {
    let mut last_dispatch: Option<Instant> = None;

    loop {
        if inner.closed.load(Ordering::SeqCst) {
            break;
        }
        if inner.lock_pending().is_empty() {
            inner.notify.notified().await;
            continue;
        }

        // Honor the spacing before taking the head, so a clear() issued
        // during the wait still cancels it.
        if let Some(last) = last_dispatch {
            let ready_at = last + inner.min_spacing;
            let now = Instant::now();
            if now < ready_at {
                tokio::time::sleep_until(ready_at).await;
            }
        }

        let Some(task) = inner.lock_pending().pop_front() else {
            continue;
        };
        last_dispatch = Some(Instant::now());

        if let Err(error) = task.await {
            tracing::warn!(%error, "queued request failed");
        }
    }
}

/// Collapses bursts of update requests into one queued task.
///
/// The first call in a burst opens a settle window; calls during the
/// window are dropped, and when it closes a single task built by the
/// factory is enqueued. A new burst can begin once that task runs.
pub struct UpdateDebouncer {
    queue: Arc<RequestQueue>,
    window: Duration,
    scheduled: Arc<AtomicBool>,
}

impl UpdateDebouncer {
    /// Default settle window for bursts of update triggers.
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

    /// Creates a debouncer feeding `queue` with the default window.
    #[must_use]
    pub fn new(queue: Arc<RequestQueue>) -> Self {
        Self::with_window(queue, Self::DEFAULT_WINDOW)
    }

    /// Creates a debouncer with a custom settle window.
    #[must_use]
    pub fn with_window(queue: Arc<RequestQueue>, window: Duration) -> Self {
        Self {
            queue,
            window,
            scheduled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests an update; redundant calls within the window coalesce.
    ///
    /// The factory runs when the window closes, building the task that
    /// goes onto the queue.
    pub fn schedule<F, Fut>(&self, make_update: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), ApplicationError>> + Send + 'static,
    {
        if self.scheduled.swap(true, Ordering::SeqCst) {
            return;
        }

        let queue = Arc::clone(&self.queue);
        let scheduled = Arc::clone(&self.scheduled);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            queue.enqueue(async move {
                let result = make_update().await;
                scheduled.store(false, Ordering::SeqCst);
                result
            });
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_tasks_run_in_order_with_spacing() {
        let queue = RequestQueue::new(Duration::from_millis(1000));
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = Arc::clone(&log);
            queue.enqueue(async move {
                log.lock().unwrap().push((i, Instant::now()));
                Ok(())
            });
        }

        tokio::time::sleep(Duration::from_millis(2500)).await;

        let log = log.lock().unwrap();
        assert_eq!(
            log.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        for window in log.windows(2) {
            let gap = window[1].1 - window[0].1;
            assert!(gap >= Duration::from_millis(1000), "gap was {gap:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_discards_waiting_tasks() {
        let queue = RequestQueue::new(Duration::from_millis(1000));
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let ran = Arc::clone(&ran);
            queue.enqueue(async move {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        // Let the first task dispatch, then clear during the spacing wait.
        tokio::time::sleep(Duration::from_millis(100)).await;
        queue.clear();
        tokio::time::sleep(Duration::from_millis(3000)).await;

        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(queue.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_task_does_not_stall_queue() {
        let queue = RequestQueue::new(Duration::from_millis(10));
        let ran = Arc::new(AtomicUsize::new(0));

        queue.enqueue(async { Err(ApplicationError::Internal("boom".to_string())) });
        let counter = Arc::clone(&ran);
        queue.enqueue(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_coalesces_burst() {
        let queue = Arc::new(RequestQueue::new(Duration::from_millis(10)));
        let debouncer = UpdateDebouncer::with_window(Arc::clone(&queue), Duration::from_millis(300));
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let ran = Arc::clone(&ran);
            debouncer.schedule(move || async move {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_allows_new_burst_after_flush() {
        let queue = Arc::new(RequestQueue::new(Duration::from_millis(10)));
        let debouncer = UpdateDebouncer::with_window(Arc::clone(&queue), Duration::from_millis(300));
        let ran = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&ran);
        debouncer.schedule(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let counter = Arc::clone(&ran);
        debouncer.schedule(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(ran.load(Ordering::SeqCst), 2);
    }
}
