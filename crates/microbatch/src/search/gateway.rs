use std::sync::Arc;

use tokio::sync::{Semaphore, oneshot};
use tracing::trace;

use crate::communication::{PendingRequest, Pill, ResultHandle};
use crate::config::SearchConfig;
use crate::core::batch::batch_loop;
use crate::core::queue::SubmissionQueue;
use crate::core::worker::BatchWorkerHandle;
use crate::error::{GatewayError, Result};
use crate::search::handler::QueryHandler;
use crate::search::result::QueryResponse;
use crate::search::store::VectorStore;

/// The stateful gateway: upserts append to the shared vector store
/// synchronously, queries go through the batching path and are ranked
/// against a store snapshot.
pub struct SearchGateway {
    store: Arc<VectorStore>,
    queue: Arc<SubmissionQueue<PendingRequest<Vec<f32>, QueryResponse>>>,
    handle: BatchWorkerHandle,
    dim: usize,
}

impl SearchGateway {
    pub fn new(config: SearchConfig) -> Self {
        let store = Arc::new(VectorStore::new(config.dim));
        let queue = Arc::new(SubmissionQueue::new());
        let limiter = Arc::new(Semaphore::new(config.batch.admission_limit));
        let handler = Arc::new(QueryHandler::new(store.clone(), config.top_k));
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

        Self {
            store,
            queue,
            handle,
            dim: config.dim,
        }
    }

    /// Appends a vector to the store, bypassing the batching path entirely.
    /// Returns the new total count.
    pub async fn upsert(&self, vector: Vec<f32>, id: Option<String>) -> Result<usize> {
        self.store.upsert(vector, id).await
    }

    /// Enqueues a similarity query. Dimension is validated here, before the
    /// request ever enters the queue.
    pub async fn query(&self, vector: Vec<f32>) -> Result<ResultHandle<QueryResponse>> {
        if vector.len() != self.dim {
            return Err(GatewayError::DimensionMismatch {
                expected: self.dim,
                found: vector.len(),
            });
        }

        let (tx, rx) = oneshot::channel();
        let request = PendingRequest::new(vector, tx);
        trace!(id = %request.id(), "query accepted");
        self.queue.push(request).await;
        Ok(ResultHandle::new(rx))
    }

    /// Shared ownership handle to the store, for callers that upsert from
    /// elsewhere.
    pub fn store(&self) -> Arc<VectorStore> {
        self.store.clone()
    }

    /// Queries accepted but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.queue.in_flight()
    }

    pub fn shutdown(&mut self) {
        self.handle.shutdown();
    }
}
