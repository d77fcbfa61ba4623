use serde::Serialize;

/// What the caller of [`submit`](super::InferGateway::submit) receives:
/// the compute output row for their payload plus the end-to-end latency,
/// queueing and batch formation included.
#[derive(Debug, Clone, Serialize)]
pub struct Completion<R> {
    pub output: R,
    pub latency_ms: f64,
}
