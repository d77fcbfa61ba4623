use std::sync::Arc;

use tokio::sync::{Semaphore, oneshot};
use tracing::trace;

use crate::communication::{PendingRequest, Pill, ResultHandle};
use crate::config::InferConfig;
use crate::core::batch::batch_loop;
use crate::core::queue::SubmissionQueue;
use crate::core::worker::BatchWorkerHandle;
use crate::infer::completion::Completion;
use crate::infer::core_trait::Compute;
use crate::infer::handler::InferHandler;

type InferQueue<C> =
    SubmissionQueue<PendingRequest<<C as Compute>::Payload, Completion<<C as Compute>::Output>>>;

/// The stateless gateway: aggregates independent submit calls into bounded
/// batches for a single downstream bulk-compute call.
///
/// Construction spawns one background scheduler task; dropping the gateway
/// shuts it down.
pub struct InferGateway<C: Compute> {
    queue: Arc<InferQueue<C>>,
    handle: BatchWorkerHandle,
}

impl<C: Compute> InferGateway<C> {
    pub fn new(compute: C, config: InferConfig) -> Self {
        let queue = Arc::new(SubmissionQueue::new());
        let limiter = Arc::new(Semaphore::new(config.batch.admission_limit));
        let handler = Arc::new(InferHandler::new(compute, config.slow_path_probability));
        let pill = Pill::new();

        let handle = BatchWorkerHandle::new(queue.waker(), {
            let queue = queue.clone();
            let batch_config = config.batch.clone();
            move |running| {
                tokio::spawn(async move {
                    let _pill = pill;
                    batch_loop(handler, queue, limiter, batch_config, running).await;
                })
            }
        });

        Self { queue, handle }
    }

    /// Enqueues a payload and returns the handle its result will arrive
    /// through. Enqueueing never fails and never applies backpressure.
    pub async fn submit(&self, payload: C::Payload) -> ResultHandle<Completion<C::Output>> {
        let (tx, rx) = oneshot::channel();
        let request = PendingRequest::new(payload, tx);
        trace!(id = %request.id(), "infer request accepted");
        self.queue.push(request).await;
        ResultHandle::new(rx)
    }

    /// Requests accepted but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.queue.in_flight()
    }

    /// Stops the scheduler. Requests still queued stop being drained;
    /// their handles resolve as cancelled when the gateway is dropped.
    pub fn shutdown(&mut self) {
        self.handle.shutdown();
    }
}
