//! Lifecycle management for the background scheduler task.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::{sync::Notify, task::JoinHandle};

/// A handle owning one background batching loop.
///
/// The handle holds the loop's running flag and join handle. `shutdown`
/// flips the flag and wakes the queue so an idle loop observes it promptly;
/// dropping the handle does the same, so a gateway going out of scope tears
/// its scheduler down.
pub struct BatchWorkerHandle {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    wake: Arc<Notify>,
}

impl BatchWorkerHandle {
    /// Spawns the worker. `wake` is the queue's notifier; `task` receives
    /// the running flag and must return the spawned loop's join handle.
    pub fn new<F>(wake: Arc<Notify>, task: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>) -> JoinHandle<()>,
    {
        let running = Arc::new(AtomicBool::new(true));
        let handle = task(running.clone());

        Self {
            running,
            handle: Some(handle),
            wake,
        }
    }

    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Initiates a graceful shutdown: clears the running flag, wakes the
    /// loop, and detaches a task awaiting its completion.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.wake.notify_waiters();

        if let Some(handle) = self.handle.take() {
            tokio::spawn(async move {
                let _ = handle.await;
            });
        }
    }
}

impl Drop for BatchWorkerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
