//! Wire schema for the transport boundary.
//!
//! The transport layer itself lives outside this crate; these are the
//! tagged request/response shapes it is expected to speak, with the
//! ingress validation rule applied before anything enters the core.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::search::Match;

/// One logical client request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Stateless inference over an opaque payload.
    Infer { payload: serde_json::Value },
    /// Append a vector to the store. Bypasses batching.
    Upsert {
        vec: Vec<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    /// Similarity query through the batching path.
    Query { vec: Vec<f32> },
}

impl Request {
    /// The ingress dimension rule: vector-bearing requests must match the
    /// deployment's fixed dimension. Violations are caller-visible errors
    /// and are never enqueued.
    pub fn validate(&self, dim: usize) -> Result<()> {
        match self {
            Request::Infer { .. } => Ok(()),
            Request::Upsert { vec, .. } | Request::Query { vec } => {
                if vec.len() == dim {
                    Ok(())
                } else {
                    Err(GatewayError::DimensionMismatch {
                        expected: dim,
                        found: vec.len(),
                    })
                }
            }
        }
    }
}

/// One logical response, mirroring [`Request`] variant for variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Response {
    Infer { latency_ms: f64 },
    Upsert { count: usize },
    Query { matches: Vec<Match>, latency_ms: f64 },
}
