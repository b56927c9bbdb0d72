use std::cmp::Ordering;

use crate::error::ClusterError;

/// Cosine similarity between two embeddings.
///
/// A zero-magnitude vector has no direction, so any pair involving one is
/// defined as similarity 0.0 rather than an error. Callers that must treat
/// degenerate embeddings as fatal should validate before embedding reaches
/// this crate.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let norm_a = norm(a);
    let norm_b = norm(b);
    cosine_with_norms(a, b, norm_a, norm_b)
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

/// Cosine similarity with precomputed norms.
fn cosine_with_norms(a: &[f32], b: &[f32], norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    dot / (norm_a * norm_b)
}

/// Pairwise cosine similarity across a batch, stored as a flat row-major
/// N×N buffer. Symmetric; the diagonal is 1.0 but nothing downstream
/// consults it (self-pairs are excluded from grouping).
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build the matrix for a batch of embeddings.
    ///
    /// All embeddings must share one dimensionality; the first vector sets
    /// the expected dimension and any deviation fails the whole batch.
    pub fn build(embeddings: &[Vec<f32>]) -> Result<Self, ClusterError> {
        let n = embeddings.len();
        let expected = embeddings.first().map(|v| v.len()).unwrap_or(0);
        for (index, v) in embeddings.iter().enumerate() {
            if v.len() != expected {
                return Err(ClusterError::DimensionMismatch {
                    index,
                    expected,
                    actual: v.len(),
                });
            }
        }

        let norms: Vec<f64> = embeddings.iter().map(|v| norm(v)).collect();

        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let sim = cosine_with_norms(&embeddings[i], &embeddings[j], norms[i], norms[j]);
                values[i * n + j] = sim;
                values[j * n + i] = sim;
            }
        }

        Ok(Self { n, values })
    }

    /// Batch size N.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity of the pair (i, j).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }
}

/// Rank batch articles by similarity to a query embedding, most similar
/// first. Returns up to `limit` `(batch_index, similarity)` pairs.
pub fn rank_similar(
    query: &[f32],
    embeddings: &[Vec<f32>],
    limit: usize,
) -> Result<Vec<(usize, f64)>, ClusterError> {
    for (index, v) in embeddings.iter().enumerate() {
        if v.len() != query.len() {
            return Err(ClusterError::DimensionMismatch {
                index,
                expected: query.len(),
                actual: v.len(),
            });
        }
    }

    let query_norm = norm(query);
    let mut ranked: Vec<(usize, f64)> = embeddings
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine_with_norms(query, v, query_norm, norm(v))))
        .collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- cosine_similarity tests ---

    #[test]
    fn identical_vectors_similarity_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn orthogonal_vectors_similarity_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-10);
    }

    #[test]
    fn opposite_vectors_similarity_is_negative_one() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn zero_vector_pairs_are_similarity_zero() {
        // Pinned policy: degenerate vectors never error, they just match nothing.
        let a = vec![1.0, 2.0];
        let z = vec![0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &z), 0.0);
        assert_eq!(cosine_similarity(&z, &a), 0.0);
        assert_eq!(cosine_similarity(&z, &z), 0.0);
    }

    #[test]
    fn scaled_vectors_are_identical_similarity() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-10);
    }

    // --- SimilarityMatrix tests ---

    #[test]
    fn matrix_is_symmetric() {
        let embeddings = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.7, 0.7, 0.0],
            vec![0.0, 0.2, 1.0],
        ];
        let matrix = SimilarityMatrix::build(&embeddings).unwrap();
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i), "asymmetry at ({i}, {j})");
            }
        }
    }

    #[test]
    fn matrix_diagonal_is_one() {
        let embeddings = vec![vec![3.0, 4.0], vec![-1.0, 2.0]];
        let matrix = SimilarityMatrix::build(&embeddings).unwrap();
        assert_eq!(matrix.get(0, 0), 1.0);
        assert_eq!(matrix.get(1, 1), 1.0);
    }

    #[test]
    fn matrix_values_are_in_cosine_range() {
        let embeddings = vec![
            vec![1.0, -2.0, 0.5],
            vec![-0.3, 0.9, 2.0],
            vec![4.0, 4.0, 4.0],
        ];
        let matrix = SimilarityMatrix::build(&embeddings).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let sim = matrix.get(i, j);
                assert!((-1.0..=1.0).contains(&sim), "sim ({i},{j}) = {sim} out of range");
            }
        }
    }

    #[test]
    fn empty_batch_builds_empty_matrix() {
        let matrix = SimilarityMatrix::build(&[]).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn mismatched_dimensions_fail_with_offending_index() {
        let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
        let err = SimilarityMatrix::build(&embeddings).unwrap_err();
        assert_eq!(
            err,
            ClusterError::DimensionMismatch {
                index: 2,
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn build_is_deterministic() {
        let embeddings = vec![
            vec![0.1, 0.9, 0.3],
            vec![0.8, 0.2, 0.1],
            vec![0.5, 0.5, 0.5],
        ];
        let a = SimilarityMatrix::build(&embeddings).unwrap();
        let b = SimilarityMatrix::build(&embeddings).unwrap();
        assert_eq!(a.values, b.values);
    }

    // --- rank_similar tests ---

    #[test]
    fn ranking_orders_most_similar_first() {
        let query = vec![1.0, 0.0];
        let embeddings = vec![
            vec![0.0, 1.0],  // orthogonal
            vec![1.0, 0.1],  // near-identical
            vec![1.0, 1.0],  // 45 degrees
        ];
        let ranked = rank_similar(&query, &embeddings, 3).unwrap();
        let order: Vec<usize> = ranked.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn ranking_respects_limit() {
        let query = vec![1.0, 0.0];
        let embeddings = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]];
        let ranked = rank_similar(&query, &embeddings, 2).unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn ranking_rejects_mismatched_dimensions() {
        let query = vec![1.0, 0.0];
        let embeddings = vec![vec![1.0, 0.0, 0.0]];
        assert!(matches!(
            rank_similar(&query, &embeddings, 1),
            Err(ClusterError::DimensionMismatch { index: 0, .. })
        ));
    }
}
