use std::time::Instant;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::communication::PendingRequest;
use crate::core::handler::BatchHandler;
use crate::error::{GatewayError, Result};
use crate::infer::completion::Completion;
use crate::infer::core_trait::Compute;

/// Execution policy for the stateless variant: stack payloads, run the
/// opaque compute once for the whole batch, occasionally take the slow
/// path, then fan latencies out.
pub struct InferHandler<C> {
    compute: C,
    slow_path_probability: f64,
}

impl<C> InferHandler<C> {
    pub fn new(compute: C, slow_path_probability: f64) -> Self {
        Self {
            compute,
            slow_path_probability,
        }
    }
}

#[async_trait]
impl<C> BatchHandler for InferHandler<C>
where
    C: Compute,
{
    type Payload = C::Payload;
    type Response = Completion<C::Output>;
    type BatchInput = Vec<C::Payload>;
    type BatchOutput = Vec<C::Output>;

    async fn make_batch_input(
        &self,
        requests: &[PendingRequest<Self::Payload, Self::Response>],
    ) -> Self::BatchInput {
        requests.iter().map(|r| r.payload().clone()).collect()
    }

    async fn forward(&self, input: Self::BatchInput) -> Result<Self::BatchOutput> {
        let output = self.compute.forward(input).await?;

        // One unlucky roll delays the whole batch. The roll is independent
        // of the payloads and never changes a response.
        if self.slow_path_probability > 0.0
            && rand::thread_rng().r#gen::<f64>() < self.slow_path_probability
        {
            debug!("slow path triggered for this batch");
            self.compute.slow_path().await;
        }

        // Latency is stamped after this barrier, so the compute cost is
        // fully accounted.
        self.compute.synchronize().await;
        Ok(output)
    }

    async fn handle_outputs(
        &self,
        batch: &mut Vec<PendingRequest<Self::Payload, Self::Response>>,
        output: Self::BatchOutput,
    ) {
        if output.len() != batch.len() {
            let error = GatewayError::compute(format!(
                "compute returned {} rows for {} requests",
                output.len(),
                batch.len()
            ));
            for request in batch.iter_mut() {
                request.resolve(Err(error.clone()));
            }
            batch.clear();
            return;
        }

        let now = Instant::now();
        for (mut request, row) in batch.drain(..).zip(output) {
            let latency_ms = now.duration_since(request.submitted_at()).as_secs_f64() * 1e3;
            request.resolve(Ok(Completion {
                output: row,
                latency_ms,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    struct AddTen;

    #[async_trait]
    impl Compute for AddTen {
        type Payload = u32;
        type Output = u32;

        async fn forward(&self, batch: Vec<u32>) -> Result<Vec<u32>> {
            Ok(batch.into_iter().map(|x| x + 10).collect())
        }
    }

    struct WrongArity;

    #[async_trait]
    impl Compute for WrongArity {
        type Payload = u32;
        type Output = u32;

        async fn forward(&self, _batch: Vec<u32>) -> Result<Vec<u32>> {
            Ok(vec![1])
        }
    }

    fn request(payload: u32) -> (
        PendingRequest<u32, Completion<u32>>,
        oneshot::Receiver<Result<Completion<u32>>>,
    ) {
        let (tx, rx) = oneshot::channel();
        (PendingRequest::new(payload, tx), rx)
    }

    #[tokio::test]
    async fn outputs_map_back_positionally() {
        let handler = InferHandler::new(AddTen, 0.0);
        let (a, rx_a) = request(1);
        let (b, rx_b) = request(2);
        let mut batch = vec![a, b];

        let input = handler.make_batch_input(&batch).await;
        assert_eq!(input, vec![1, 2]);
        let output = handler.forward(input).await.unwrap();
        handler.handle_outputs(&mut batch, output).await;

        assert!(batch.is_empty());
        let a = rx_a.await.unwrap().unwrap();
        let b = rx_b.await.unwrap().unwrap();
        assert_eq!(a.output, 11);
        assert_eq!(b.output, 12);
        assert!(a.latency_ms >= 0.0);
    }

    #[tokio::test]
    async fn a_row_count_mismatch_fails_the_batch() {
        let handler = InferHandler::new(WrongArity, 0.0);
        let (a, rx_a) = request(1);
        let (b, rx_b) = request(2);
        let mut batch = vec![a, b];

        let input = handler.make_batch_input(&batch).await;
        let output = handler.forward(input).await.unwrap();
        handler.handle_outputs(&mut batch, output).await;

        assert!(matches!(rx_a.await.unwrap(), Err(GatewayError::Compute(_))));
        assert!(matches!(rx_b.await.unwrap(), Err(GatewayError::Compute(_))));
    }

    #[tokio::test]
    async fn probability_one_always_takes_the_slow_path() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        struct Flagging {
            slow: Arc<AtomicBool>,
            synced: Arc<AtomicBool>,
        }

        #[async_trait]
        impl Compute for Flagging {
            type Payload = u32;
            type Output = u32;

            async fn forward(&self, batch: Vec<u32>) -> Result<Vec<u32>> {
                Ok(batch)
            }

            async fn slow_path(&self) {
                self.slow.store(true, Ordering::SeqCst);
            }

            async fn synchronize(&self) {
                self.synced.store(true, Ordering::SeqCst);
            }
        }

        let slow = Arc::new(AtomicBool::new(false));
        let synced = Arc::new(AtomicBool::new(false));
        let handler = InferHandler::new(
            Flagging {
                slow: slow.clone(),
                synced: synced.clone(),
            },
            1.0,
        );

        handler.forward(vec![1]).await.unwrap();
        assert!(slow.load(Ordering::SeqCst));
        assert!(synced.load(Ordering::SeqCst));
    }
}
