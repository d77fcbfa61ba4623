//! The batch-formation scheduler.
//!
//! One loop per gateway drains the submission queue into bounded batches
//! under a dual count/time policy, gates entry to the compute phase through
//! the admission limiter, and hands each batch to its [`BatchHandler`].
//! Execution is spawned, so the loop goes straight back to forming the next
//! batch while up to `admission_limit` earlier batches are still computing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::{Instant, timeout};
use tracing::{trace, warn};

use crate::communication::PendingRequest;
use crate::config::BatchConfig;
use crate::core::handler::BatchHandler;
use crate::core::queue::SubmissionQueue;

/// How long an idle scheduler parks before re-checking its running flag.
const IDLE_RECHECK: Duration = Duration::from_millis(100);

/// Runs until the running flag clears. Every queued request that makes it
/// into a batch is resolved exactly once, success or failure; a failing
/// batch never stalls the loop.
pub(crate) async fn batch_loop<H: BatchHandler>(
    handler: Arc<H>,
    queue: Arc<SubmissionQueue<PendingRequest<H::Payload, H::Response>>>,
    limiter: Arc<Semaphore>,
    config: BatchConfig,
    running: Arc<AtomicBool>,
) {
    while running.load(Ordering::SeqCst) {
        // Wait for the first item; time out periodically so shutdown is
        // observed even on a quiet queue.
        let first = match timeout(IDLE_RECHECK, queue.pop()).await {
            Ok(item) => item,
            Err(_) => continue,
        };

        let batch = fill_batch(first, &queue, &config).await;
        trace!(size = batch.len(), "batch formed");

        let permit = match limiter.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let handler = handler.clone();
        let queue = queue.clone();
        tokio::spawn(async move {
            execute_batch(handler, batch, &queue).await;
            drop(permit);
        });
    }
}

/// Accumulates a batch under the dual bound: at most `max_batch_size`
/// items, at most `flush_window` of accumulation time. The size bound is
/// checked first, so a burst that fills the batch flushes immediately.
/// When the queue runs momentarily dry the loop sleeps a quarter-window
/// instead of spinning.
pub(crate) async fn fill_batch<T>(
    first: T,
    queue: &SubmissionQueue<T>,
    config: &BatchConfig,
) -> Vec<T> {
    let mut batch = vec![first];
    let started = Instant::now();
    let window = config.flush_window();
    let poll = config.poll_interval();

    while batch.len() < config.max_batch_size && started.elapsed() < window {
        match queue.try_pop().await {
            Some(item) => batch.push(item),
            None => tokio::time::sleep(poll).await,
        }
    }
    batch
}

/// Drives one batch through the handler and accounts for each item.
pub(crate) async fn execute_batch<H: BatchHandler>(
    handler: Arc<H>,
    mut batch: Vec<PendingRequest<H::Payload, H::Response>>,
    queue: &SubmissionQueue<PendingRequest<H::Payload, H::Response>>,
) {
    let size = batch.len();
    let input = handler.make_batch_input(&batch).await;
    match handler.forward(input).await {
        Ok(output) => handler.handle_outputs(&mut batch, output).await,
        Err(error) => {
            warn!(%error, size, "batch compute failed");
            for request in batch.iter_mut() {
                request.resolve(Err(error.clone()));
            }
        }
    }
    for _ in 0..size {
        queue.task_done();
    }
}
