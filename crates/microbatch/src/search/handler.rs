use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::communication::PendingRequest;
use crate::core::handler::BatchHandler;
use crate::error::Result;
use crate::search::engine;
use crate::search::result::QueryResponse;
use crate::search::store::{StoreSnapshot, VectorStore};

/// Execution policy for the stateful variant: snapshot the store under its
/// lock, score the whole batch against the snapshot lock-free, fan ranked
/// matches back out.
pub struct QueryHandler {
    store: Arc<VectorStore>,
    top_k: usize,
}

impl QueryHandler {
    pub fn new(store: Arc<VectorStore>, top_k: usize) -> Self {
        Self { store, top_k }
    }
}

#[async_trait]
impl BatchHandler for QueryHandler {
    type Payload = Vec<f32>;
    type Response = QueryResponse;
    type BatchInput = (Vec<Vec<f32>>, StoreSnapshot);
    type BatchOutput = Vec<Vec<crate::search::result::Match>>;

    async fn make_batch_input(
        &self,
        requests: &[PendingRequest<Self::Payload, Self::Response>],
    ) -> Self::BatchInput {
        let queries = requests.iter().map(|r| r.payload().clone()).collect();
        // the snapshot is the only store access this batch will make; the
        // similarity pass below runs without the lock
        (queries, self.store.snapshot().await)
    }

    async fn forward(&self, (queries, snapshot): Self::BatchInput) -> Result<Self::BatchOutput> {
        if snapshot.is_empty() {
            // valid terminal case: nothing to rank against yet
            return Ok(vec![Vec::new(); queries.len()]);
        }
        Ok(engine::top_k_matches(&queries, &snapshot, self.top_k))
    }

    async fn handle_outputs(
        &self,
        batch: &mut Vec<PendingRequest<Self::Payload, Self::Response>>,
        output: Self::BatchOutput,
    ) {
        debug_assert_eq!(output.len(), batch.len());
        let now = Instant::now();
        for (mut request, matches) in batch.drain(..).zip(output) {
            let latency_ms = now.duration_since(request.submitted_at()).as_secs_f64() * 1e3;
            request.resolve(Ok(QueryResponse {
                matches,
                latency_ms,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn empty_store_short_circuits_with_empty_matches() {
        let store = Arc::new(VectorStore::new(2));
        let handler = QueryHandler::new(store, 10);

        let (tx, rx) = oneshot::channel();
        let mut batch = vec![PendingRequest::new(vec![1.0, 0.0], tx)];

        let input = handler.make_batch_input(&batch).await;
        let output = handler.forward(input).await.unwrap();
        handler.handle_outputs(&mut batch, output).await;

        let response = rx.await.unwrap().unwrap();
        assert!(response.matches.is_empty());
        assert!(response.latency_ms >= 0.0);
    }

    #[tokio::test]
    async fn each_query_row_gets_its_own_ranking() {
        let store = Arc::new(VectorStore::new(2));
        store
            .upsert(vec![1.0, 0.0], Some("x".into()))
            .await
            .unwrap();
        store
            .upsert(vec![0.0, 1.0], Some("y".into()))
            .await
            .unwrap();
        let handler = QueryHandler::new(store, 1);

        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        let mut batch = vec![
            PendingRequest::new(vec![1.0, 0.0], tx_a),
            PendingRequest::new(vec![0.0, 1.0], tx_b),
        ];

        let input = handler.make_batch_input(&batch).await;
        let output = handler.forward(input).await.unwrap();
        handler.handle_outputs(&mut batch, output).await;

        assert_eq!(rx_a.await.unwrap().unwrap().matches[0].id, "x");
        assert_eq!(rx_b.await.unwrap().unwrap().matches[0].id, "y");
    }
}
