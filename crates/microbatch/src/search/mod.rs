//! # Stateful variant
//!
//! Approximate nearest-neighbor serving over a growing in-memory vector
//! store. Upserts append synchronously under the store lock; queries ride
//! the batching path and are scored against a point-in-time snapshot, so a
//! slow similarity pass never blocks unrelated writes.

mod engine;
mod gateway;
mod handler;
mod result;
mod store;

pub use engine::{dot, l2_normalize, top_k_matches};
pub use gateway::SearchGateway;
pub use handler::QueryHandler;
pub use result::{Match, QueryResponse};
pub use store::{StoreSnapshot, VectorStore};
