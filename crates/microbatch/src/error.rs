//! Error types shared across the gateway.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors a caller can observe through the gateway surface.
///
/// The enum is `Clone` because a single compute failure is fanned out to
/// every handle in the affected batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// A vector with the wrong dimensionality reached ingress. Rejected
    /// before it is ever enqueued.
    #[error("dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The batched compute operation failed. Every request in the batch
    /// receives this error rather than hanging on an unresolved handle.
    #[error("batch compute failed: {0}")]
    Compute(String),

    /// The result slot was dropped before a value arrived, typically
    /// because the gateway shut down while the request was in flight.
    #[error("request cancelled before completion")]
    Cancelled,
}

impl GatewayError {
    pub(crate) fn compute(msg: impl Into<String>) -> Self {
        GatewayError::Compute(msg.into())
    }
}
