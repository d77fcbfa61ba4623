use async_trait::async_trait;

use crate::communication::PendingRequest;
use crate::error::Result;

/// The seam between the generic scheduler and a concrete execution policy.
///
/// The scheduler drives one batch through three phases: `make_batch_input`
/// stacks the queued payloads into whatever the compute step consumes,
/// `forward` runs the (potentially slow, possibly failing) computation, and
/// `handle_outputs` fans the rows back out to each request's handle.
///
/// Implementations must preserve positional correspondence: output row `i`
/// belongs to request `i` of the batch. Latency stamping happens inside
/// `handle_outputs`, after `forward` has fully completed, so the measured
/// time covers queueing, formation, and compute.
#[async_trait]
pub trait BatchHandler: Send + Sync + 'static {
    type Payload: Send + 'static;
    type Response: Send + 'static;
    type BatchInput: Send;
    type BatchOutput: Send;

    /// Assemble one ordered batch input from the queued requests.
    async fn make_batch_input(
        &self,
        requests: &[PendingRequest<Self::Payload, Self::Response>],
    ) -> Self::BatchInput;

    /// Run the bulk computation. An error here fails the whole batch; the
    /// scheduler resolves every handle with it.
    async fn forward(&self, input: Self::BatchInput) -> Result<Self::BatchOutput>;

    /// Unstack the output and resolve every request in the batch.
    async fn handle_outputs(
        &self,
        batch: &mut Vec<PendingRequest<Self::Payload, Self::Response>>,
        output: Self::BatchOutput,
    );
}
