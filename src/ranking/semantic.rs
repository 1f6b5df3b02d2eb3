//! Semantic similarity scoring against a query vector

use std::collections::HashMap;

use uuid::Uuid;

use crate::similarity::cosine_similarity;

/// Cosine similarity of each entity vector against the query, clipped to ≥ 0
///
/// Only positive alignment is meaningful for ranking, so negative
/// similarities are clipped to zero. Entities without a vector are simply
/// absent from the map; callers pass `None` for a missing query vector and
/// get an empty map, letting the semantic weight contribute nothing.
pub fn semantic_scores(
    query_vector: Option<&[f32]>,
    entity_vectors: &HashMap<Uuid, Vec<f32>>,
) -> HashMap<Uuid, f64> {
    let Some(query) = query_vector else {
        return HashMap::new();
    };

    entity_vectors
        .iter()
        .map(|(id, vector)| {
            let similarity = cosine_similarity(query, vector).max(0.0);
            (*id, similarity as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_no_query_vector_yields_empty_map() {
        let vectors = HashMap::from([(id(1), vec![1.0, 0.0])]);
        assert!(semantic_scores(None, &vectors).is_empty());
    }

    #[test]
    fn test_negative_similarity_clipped() {
        let vectors = HashMap::from([
            (id(1), vec![1.0, 0.0]),
            (id(2), vec![-1.0, 0.0]),
        ]);
        let scores = semantic_scores(Some(&[1.0, 0.0]), &vectors);
        assert!((scores[&id(1)] - 1.0).abs() < 1e-6);
        assert_eq!(scores[&id(2)], 0.0);
    }

    #[test]
    fn test_zero_norm_vector_scores_zero() {
        let vectors = HashMap::from([(id(1), vec![0.0, 0.0])]);
        let scores = semantic_scores(Some(&[1.0, 0.0]), &vectors);
        assert_eq!(scores[&id(1)], 0.0);
    }

    #[test]
    fn test_entities_without_vectors_absent() {
        let vectors = HashMap::from([(id(1), vec![1.0, 0.0])]);
        let scores = semantic_scores(Some(&[1.0, 0.0]), &vectors);
        assert!(!scores.contains_key(&id(2)));
    }
}
