//! # Microbatch
//!
//! An asynchronous **micro-batching** gateway for latency-sensitive serving:
//! many independent, small client requests are aggregated into bounded
//! batches for a single downstream bulk-compute call, trading a few
//! milliseconds of queueing delay for large compute-efficiency gains.
//!
//! ## Overview
//!
//! Two gateway variants share one scheduler core:
//!
//! - [`infer::InferGateway`] - stateless: opaque payloads in, one bulk
//!   compute call per batch, `{output, latency_ms}` out.
//! - [`search::SearchGateway`] - stateful: a growing in-memory vector store
//!   that is appended to synchronously and queried through the batching
//!   path against point-in-time snapshots.
//!
//! ## Architecture
//!
//! The core is a batch-formation scheduler with a dual flush policy: a
//! batch is emitted once it reaches `max_batch_size` items or once
//! `flush_window` has elapsed since its first item, whichever comes first.
//! While the queue is momentarily dry the scheduler polls with a bounded
//! quarter-window sleep rather than spinning.
//!
//! Each submit call receives a [`ResultHandle`], a single-assignment slot
//! the scheduler resolves exactly once - with the result row on success, or
//! with the batch's error on compute failure. An admission limiter
//! (counting semaphore) bounds how many batches may be mid-compute
//! simultaneously; batch formation itself is never blocked by it.
//!
//! ## Guarantees
//!
//! - Within a batch, output row `i` belongs to input item `i`.
//! - Every request that enters a batch is resolved, success or failure; a
//!   failing batch never stalls the scheduler loop.
//! - No ordering guarantee across batches.
//! - Ingress applies no backpressure: the queue is unbounded, and under
//!   sustained overload queueing delay grows instead of requests being
//!   rejected.

mod communication;

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod infer;
pub mod search;

pub use communication::{PendingRequest, ResultHandle};
pub use config::{BatchConfig, InferConfig, SearchConfig};
pub use error::{GatewayError, Result};
