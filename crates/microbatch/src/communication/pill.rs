use std::thread;

/// # Pill
///
/// Panic propagation for the scheduler task.
///
/// An instance is moved into the spawned batching loop. If the loop panics,
/// the `Pill` is dropped during unwinding and re-raises, so a dead scheduler
/// surfaces as a loud failure instead of a queue that silently stops
/// draining while every caller hangs on its handle.
pub struct Pill {}

impl Pill {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for Pill {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Pill {
    fn drop(&mut self) {
        if thread::panicking() {
            panic!("batch scheduler task panicked");
        }
    }
}
