use serde::{Deserialize, Serialize};

/// One scored hit from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub score: f32,
}

/// What a query caller receives: the ranked matches (possibly empty when
/// the store was empty at snapshot time) and the end-to-end latency.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub matches: Vec<Match>,
    pub latency_ms: f64,
}
