//! Configuration for the batching gateways.
//!
//! All knobs are plain serde structs so deployments can load them from any
//! config source. Defaults reproduce the reference deployment: batches of at
//! most 64, single-digit-millisecond flush windows, three concurrent compute
//! submissions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Controls batch formation and admission for one scheduler loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Hard cap on items per batch.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Maximum time a batch may accumulate before it is flushed regardless
    /// of size.
    #[serde(default = "default_flush_window_ms")]
    pub flush_window_ms: u64,

    /// How many batches may be inside the compute-submission phase at once.
    #[serde(default = "default_admission_limit")]
    pub admission_limit: usize,
}

impl BatchConfig {
    /// The flush window as a [`Duration`].
    pub fn flush_window(&self) -> Duration {
        Duration::from_millis(self.flush_window_ms)
    }

    /// Sleep granularity while the queue is momentarily dry: a quarter of
    /// the flush window, so an empty queue is re-polled a handful of times
    /// before the window closes.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_micros(self.flush_window_ms * 1000 / 4)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            flush_window_ms: default_flush_window_ms(),
            admission_limit: default_admission_limit(),
        }
    }
}

/// Configuration for the stateless inference gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferConfig {
    #[serde(default)]
    pub batch: BatchConfig,

    /// Probability that a batch additionally runs the compute backend's
    /// slow path, inflating wall-clock time for everyone formed into it.
    /// Zero disables the roll entirely.
    #[serde(default = "default_slow_path_probability")]
    pub slow_path_probability: f64,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            batch: BatchConfig::default(),
            slow_path_probability: default_slow_path_probability(),
        }
    }
}

/// Configuration for the stateful similarity-search gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_batch")]
    pub batch: BatchConfig,

    /// Fixed vector dimension for this deployment. Vectors of any other
    /// length are rejected at ingress.
    #[serde(default = "default_dim")]
    pub dim: usize,

    /// Number of matches returned per query (fewer if the store is smaller).
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch: default_search_batch(),
            dim: default_dim(),
            top_k: default_top_k(),
        }
    }
}

fn default_max_batch_size() -> usize {
    64
}

fn default_flush_window_ms() -> u64 {
    8
}

fn default_admission_limit() -> usize {
    3
}

fn default_slow_path_probability() -> f64 {
    0.01
}

fn default_search_batch() -> BatchConfig {
    BatchConfig {
        flush_window_ms: 6,
        ..BatchConfig::default()
    }
}

fn default_dim() -> usize {
    768
}

fn default_top_k() -> usize {
    10
}
