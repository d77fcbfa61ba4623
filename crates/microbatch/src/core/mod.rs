//! # Scheduler core
//!
//! Generic machinery shared by both gateway variants:
//!
//! * [`queue`] - the unbounded submission FIFO between ingress and the
//!   scheduler, with per-item completion accounting.
//! * [`batch`] - the batch-formation loop (dual count/time flush policy),
//!   admission gating, and batch execution.
//! * [`handler`] - the [`handler::BatchHandler`] trait each execution
//!   policy implements.
//! * [`worker`] - lifecycle management for the background scheduler task.

pub mod batch;
pub mod handler;
pub mod queue;
pub mod worker;
