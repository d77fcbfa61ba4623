//! Shared pieces for the bench binaries: a stand-in compute backend with a
//! realistic tail, and naive percentile math for quick summaries.

use std::time::Duration;

use async_trait::async_trait;
use microbatch::Result;
use microbatch::infer::Compute;

/// Stand-in for the downstream bulk compute: a fixed per-batch cost plus a
/// slow path that models the occasional tail-inducing event. The gateway
/// rolls the slow-path probability; this type only supplies the costs.
pub struct TailProneCompute {
    pub batch_cost: Duration,
    pub slow_path_cost: Duration,
}

impl Default for TailProneCompute {
    fn default() -> Self {
        Self {
            batch_cost: Duration::from_millis(2),
            slow_path_cost: Duration::from_millis(80),
        }
    }
}

#[async_trait]
impl Compute for TailProneCompute {
    type Payload = serde_json::Value;
    type Output = ();

    async fn forward(&self, batch: Vec<serde_json::Value>) -> Result<Vec<()>> {
        // one bulk call per batch, cost independent of batch size
        tokio::time::sleep(self.batch_cost).await;
        Ok(vec![(); batch.len()])
    }

    async fn slow_path(&self) {
        tokio::time::sleep(self.slow_path_cost).await;
    }
}

/// Nearest-rank percentile over an already-sorted slice. `q` in [0, 100].
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = ((q / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}
