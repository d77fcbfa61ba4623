use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, Notify};

/// # SubmissionQueue
///
/// An unbounded, concurrency-safe FIFO between ingress and the scheduler.
///
/// Enqueue never fails and applies no backpressure: under sustained overload
/// the queue grows and queueing delay grows with it. That is a property of
/// the design, not an oversight, and it is preserved here.
///
/// The queue also carries an in-flight gauge: incremented on push and
/// decremented once per item when that item's result has been delivered
/// (per-item accounting, even for multi-item batches).
pub struct SubmissionQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Arc<Notify>,
    in_flight: AtomicUsize,
}

impl<T> SubmissionQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Arc::new(Notify::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Appends an item. Unbounded, so this only ever waits on the queue
    /// lock itself.
    pub async fn push(&self, item: T) {
        {
            let mut items = self.items.lock().await;
            items.push_back(item);
        }
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        self.available.notify_one();
    }

    /// Non-blocking dequeue: reports empty immediately instead of waiting.
    pub async fn try_pop(&self) -> Option<T> {
        self.items.lock().await.pop_front()
    }

    /// Blocking dequeue: suspends the calling task until an item exists.
    pub async fn pop(&self) -> T {
        loop {
            if let Some(item) = self.try_pop().await {
                return item;
            }
            self.available.notified().await;
        }
    }

    /// Items currently waiting to be drained into a batch.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Items accepted but not yet completed (queued + mid-batch).
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Marks one item complete. Called once per item after its handle has
    /// been resolved.
    pub fn task_done(&self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    /// The notifier used to wake a parked [`pop`](Self::pop), shared with
    /// the worker handle so shutdown can interrupt an idle scheduler.
    pub fn waker(&self) -> Arc<Notify> {
        self.available.clone()
    }
}

impl<T> Default for SubmissionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
