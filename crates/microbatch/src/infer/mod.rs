//! # Stateless variant
//!
//! Aggregates opaque payloads into batches for one bulk compute call per
//! batch, delivering `{output, latency_ms}` per request. The compute
//! operation is an injected [`Compute`] strategy; the gateway owns the
//! scheduler loop that feeds it.

mod completion;
mod core_trait;
mod gateway;
mod handler;

pub use completion::Completion;
pub use core_trait::Compute;
pub use gateway::InferGateway;
pub use handler::InferHandler;
