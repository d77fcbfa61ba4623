use async_trait::async_trait;

use crate::error::Result;

/// The opaque bulk-compute operation behind the stateless gateway.
///
/// The scheduler's correctness is independent of what this actually does;
/// tests substitute a deterministic fake. Implementations receive the whole
/// batch at once and must return exactly one output row per input, in input
/// order.
///
/// # Example
///
/// ```ignore
/// use microbatch::infer::Compute;
/// use async_trait::async_trait;
///
/// struct Projection {
///     weights: Vec<f32>,
/// }
///
/// #[async_trait]
/// impl Compute for Projection {
///     type Payload = Vec<f32>;
///     type Output = f32;
///
///     async fn forward(&self, batch: Vec<Vec<f32>>) -> microbatch::Result<Vec<f32>> {
///         Ok(batch
///             .iter()
///             .map(|row| row.iter().zip(&self.weights).map(|(x, w)| x * w).sum())
///             .collect())
///     }
/// }
/// ```
#[async_trait]
pub trait Compute: Send + Sync + 'static {
    /// One request's worth of input data.
    type Payload: Clone + Send + Sync + 'static;

    /// One request's worth of output data.
    type Output: Send + 'static;

    /// Process the batch. Row `i` of the result belongs to `batch[i]`.
    async fn forward(&self, batch: Vec<Self::Payload>) -> Result<Vec<Self::Output>>;

    /// Optional extra computation the executor triggers with low
    /// probability. It does not affect any response, only wall-clock time
    /// for every request formed into the unlucky batch.
    async fn slow_path(&self) {}

    /// Synchronization barrier: returns only once the compute operation has
    /// physically completed, so its full cost lands inside the measured
    /// latency. Defaults to a no-op for backends that are synchronous
    /// anyway.
    async fn synchronize(&self) {}
}
