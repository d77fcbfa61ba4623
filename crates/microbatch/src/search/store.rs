use tokio::sync::Mutex;

use crate::error::{GatewayError, Result};

/// # VectorStore
///
/// The shared mutable corpus: an append-only, lock-guarded collection of
/// fixed-dimension vectors with a parallel identifier sequence.
///
/// Vectors are stored row-major in one flat buffer. The two sequences are
/// never reordered or shrunk, so `vectors.len() == ids.len() * dim` holds at
/// every instant and any snapshot is a prefix-consistent view of the store.
pub struct VectorStore {
    dim: usize,
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    vectors: Vec<f32>,
    ids: Vec<String>,
}

/// A point-in-time copy of the store, taken under the lock and then used
/// without it, so a slow similarity pass never serializes unrelated
/// upserts. It may be stale relative to concurrently appended vectors;
/// since the store only grows, that staleness is a bounded, accepted
/// trade-off.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    dim: usize,
    vectors: Vec<f32>,
    ids: Vec<String>,
}

impl VectorStore {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            inner: Mutex::new(StoreInner {
                vectors: Vec::new(),
                ids: Vec::new(),
            }),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Appends a vector and its identifier, returning the new total count.
    /// When no identifier is supplied the current size is used, formatted
    /// as a decimal string.
    pub async fn upsert(&self, vector: Vec<f32>, id: Option<String>) -> Result<usize> {
        if vector.len() != self.dim {
            return Err(GatewayError::DimensionMismatch {
                expected: self.dim,
                found: vector.len(),
            });
        }

        let mut inner = self.inner.lock().await;
        let id = id.unwrap_or_else(|| inner.ids.len().to_string());
        inner.vectors.extend_from_slice(&vector);
        inner.ids.push(id);
        Ok(inner.ids.len())
    }

    /// Captures a consistent `(vectors, ids)` pair under the lock. The lock
    /// is released before the snapshot is used for any computation.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.lock().await;
        StoreSnapshot {
            dim: self.dim,
            vectors: inner.vectors.clone(),
            ids: inner.ids.clone(),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.ids.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.ids.is_empty()
    }
}

impl StoreSnapshot {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The `index`-th stored vector.
    pub fn row(&self, index: usize) -> &[f32] {
        &self.vectors[index * self.dim..(index + 1) * self.dim]
    }

    pub fn id(&self, index: usize) -> &str {
        &self.ids[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_returns_running_count_and_defaults_ids() {
        let store = VectorStore::new(2);
        assert_eq!(store.upsert(vec![1.0, 0.0], None).await.unwrap(), 1);
        assert_eq!(
            store
                .upsert(vec![0.0, 1.0], Some("custom".into()))
                .await
                .unwrap(),
            2
        );
        assert_eq!(store.upsert(vec![1.0, 1.0], None).await.unwrap(), 3);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.id(0), "0");
        assert_eq!(snapshot.id(1), "custom");
        assert_eq!(snapshot.id(2), "2");
    }

    #[tokio::test]
    async fn wrong_dimension_is_rejected() {
        let store = VectorStore::new(3);
        let err = store.upsert(vec![1.0], None).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::DimensionMismatch {
                expected: 3,
                found: 1
            }
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn snapshot_is_a_prefix_of_later_state() {
        let store = VectorStore::new(1);
        store.upsert(vec![1.0], None).await.unwrap();
        let snapshot = store.snapshot().await;

        store.upsert(vec![2.0], None).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.row(0), &[1.0]);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn vectors_and_ids_stay_in_lockstep_under_concurrency() {
        use std::sync::Arc;

        let store = Arc::new(VectorStore::new(4));
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                for j in 0..25 {
                    let v = vec![i as f32, j as f32, 0.0, 1.0];
                    store.upsert(v, None).await.unwrap();
                    let snapshot = store.snapshot().await;
                    // parallel sequences never diverge
                    assert_eq!(snapshot.vectors.len(), snapshot.ids.len() * snapshot.dim);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(store.len().await, 400);
    }
}
