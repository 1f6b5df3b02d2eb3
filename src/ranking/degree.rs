//! Degree centrality over the candidate relationships

use std::collections::HashMap;

use uuid::Uuid;

use crate::graph::RelationshipEdge;

/// Compute normalized degree centrality
///
/// degree(v) = appearances as source + appearances as target, over the
/// candidate relationships only; scores are divided by the maximum observed
/// degree. A set with zero relationships yields an empty map; entities
/// implicitly score 0 in the fused result and no division by zero occurs.
pub fn degree_scores(relationships: &[RelationshipEdge]) -> HashMap<Uuid, f64> {
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for edge in relationships {
        *counts.entry(edge.from_entity).or_insert(0) += 1;
        *counts.entry(edge.to_entity).or_insert(0) += 1;
    }

    let Some(&max_degree) = counts.values().max() else {
        return HashMap::new();
    };

    counts
        .into_iter()
        .map(|(id, count)| (id, count as f64 / max_degree as f64))
        .collect()
}
