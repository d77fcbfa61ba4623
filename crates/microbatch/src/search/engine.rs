//! Cosine-similarity scoring over a store snapshot.
//!
//! Queries and stored rows are L2-normalized, scored by dot product, and
//! the top `k` matches per query are returned in descending score order.
//! Equal scores are broken by ascending store insertion index, which keeps
//! results deterministic across runs.

use crate::search::result::Match;
use crate::search::store::StoreSnapshot;

/// Scales the vector to unit length in place. A zero-magnitude vector is
/// left untouched and will score 0 against everything.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Full pairwise scoring: one ranked match list per query row, each of
/// length `min(k, snapshot.len())`. Row `i` of the result belongs to
/// `queries[i]`.
pub fn top_k_matches(queries: &[Vec<f32>], snapshot: &StoreSnapshot, k: usize) -> Vec<Vec<Match>> {
    let corpus: Vec<Vec<f32>> = (0..snapshot.len())
        .map(|i| {
            let mut row = snapshot.row(i).to_vec();
            l2_normalize(&mut row);
            row
        })
        .collect();

    let k = k.min(snapshot.len());
    queries
        .iter()
        .map(|query| {
            let mut query = query.clone();
            l2_normalize(&mut query);

            let mut scored: Vec<(usize, f32)> = corpus
                .iter()
                .enumerate()
                .map(|(index, row)| (index, dot(&query, row)))
                .collect();
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            scored.truncate(k);

            scored
                .into_iter()
                .map(|(index, score)| Match {
                    id: snapshot.id(index).to_string(),
                    score,
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::store::VectorStore;

    async fn snapshot_of(dim: usize, rows: &[(&str, &[f32])]) -> StoreSnapshot {
        let store = VectorStore::new(dim);
        for (id, row) in rows {
            store
                .upsert(row.to_vec(), Some(id.to_string()))
                .await
                .unwrap();
        }
        store.snapshot().await
    }

    #[tokio::test]
    async fn self_match_scores_one() {
        let snapshot = snapshot_of(3, &[("a", &[0.0, 2.0, 0.0])]).await;
        let matches = top_k_matches(&[vec![0.0, 5.0, 0.0]], &snapshot, 10);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0][0].id, "a");
        assert!((matches[0][0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn results_are_ranked_and_capped_at_k() {
        let snapshot = snapshot_of(
            2,
            &[
                ("x", &[1.0, 0.0]),
                ("y", &[0.7, 0.7]),
                ("z", &[0.0, 1.0]),
            ],
        )
        .await;
        let matches = &top_k_matches(&[vec![1.0, 0.0]], &snapshot, 2)[0];
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "x");
        assert_eq!(matches[1].id, "y");
        assert!(matches[0].score > matches[1].score);
    }

    #[tokio::test]
    async fn ties_break_by_insertion_order() {
        let snapshot = snapshot_of(2, &[("first", &[3.0, 0.0]), ("second", &[1.0, 0.0])]).await;
        let matches = &top_k_matches(&[vec![2.0, 0.0]], &snapshot, 10)[0];
        // identical direction, identical score after normalization
        assert_eq!(matches[0].id, "first");
        assert_eq!(matches[1].id, "second");
    }

    #[tokio::test]
    async fn k_larger_than_the_store_returns_everything() {
        let snapshot = snapshot_of(2, &[("only", &[1.0, 1.0])]).await;
        let matches = &top_k_matches(&[vec![1.0, 1.0]], &snapshot, 10)[0];
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn zero_vector_scores_zero_without_nan() {
        let snapshot = snapshot_of(2, &[("a", &[1.0, 0.0])]).await;
        let matches = &top_k_matches(&[vec![0.0, 0.0]], &snapshot, 1)[0];
        assert_eq!(matches[0].score, 0.0);
    }

    #[test]
    fn normalize_leaves_unit_vectors_alone() {
        let mut v = vec![1.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![1.0, 0.0]);
    }
}
