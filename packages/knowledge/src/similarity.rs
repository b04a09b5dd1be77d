//! Cosine similarity over embedding vectors.
//!
//! Used to rank stored knowledge items against a query embedding.

use crate::error::{KnowledgeError, Result};

/// Cosine similarity between two vectors: dot(a,b) / (|a|*|b|).
///
/// Errors with `DegenerateVector` when the lengths differ or either vector
/// has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(KnowledgeError::DegenerateVector {
            reason: format!("length mismatch: {} vs {}", a.len(), b.len()),
        });
    }
    if a.is_empty() {
        return Err(KnowledgeError::DegenerateVector {
            reason: "empty vectors".to_string(),
        });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(KnowledgeError::DegenerateVector {
            reason: "zero-norm vector".to_string(),
        });
    }

    Ok(dot / (norm_a * norm_b))
}

/// An item scored against a query vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub item: T,
    pub similarity: f32,
}

/// Rank items by descending cosine similarity to `query`, keeping at most
/// `limit` results.
///
/// Items whose vector is degenerate (wrong length, zero norm) are skipped
/// rather than failing the whole batch. The sort is stable, so ties keep
/// their input order.
pub fn rank_by_similarity<T>(
    query: &[f32],
    items: impl IntoIterator<Item = (T, Vec<f32>)>,
    limit: usize,
) -> Vec<Scored<T>> {
    let mut scored: Vec<Scored<T>> = items
        .into_iter()
        .filter_map(|(item, vector)| {
            cosine_similarity(query, &vector)
                .ok()
                .map(|similarity| Scored { item, similarity })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap();
        assert!((similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(similarity.abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((similarity + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_norm_is_degenerate() {
        let err = cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, KnowledgeError::DegenerateVector { .. }));
    }

    #[test]
    fn test_length_mismatch_is_degenerate() {
        let err = cosine_similarity(&[1.0, 0.0], &[1.0]).unwrap_err();
        assert!(matches!(err, KnowledgeError::DegenerateVector { .. }));
    }

    #[test]
    fn test_empty_vectors_are_degenerate() {
        let err = cosine_similarity(&[], &[]).unwrap_err();
        assert!(matches!(err, KnowledgeError::DegenerateVector { .. }));
    }

    #[test]
    fn test_ranking_orders_by_similarity() {
        let query = vec![1.0, 0.0];
        let items = vec![
            ("a", vec![0.9f32, 0.435_889_9]), // ~0.9
            ("b", vec![0.95, 0.312_249_9]),   // ~0.95
            ("c", vec![0.2, 0.979_795_9]),    // ~0.2
        ];
        let ranked = rank_by_similarity(&query, items, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].item, "b");
        assert_eq!(ranked[1].item, "a");
    }

    #[test]
    fn test_ranking_skips_degenerate_vectors() {
        let query = vec![1.0, 0.0];
        let items = vec![
            ("zero", vec![0.0f32, 0.0]),
            ("short", vec![1.0]),
            ("ok", vec![1.0, 0.0]),
        ];
        let ranked = rank_by_similarity(&query, items, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].item, "ok");
    }

    #[test]
    fn test_ranking_ties_keep_insertion_order() {
        let query = vec![1.0, 0.0];
        let items = vec![
            ("first", vec![2.0f32, 0.0]),
            ("second", vec![5.0, 0.0]),
            ("third", vec![0.5, 0.0]),
        ];
        // all three score exactly 1.0; stable sort keeps input order
        let ranked = rank_by_similarity(&query, items, 3);
        let order: Vec<&str> = ranked.iter().map(|s| s.item).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }
}
