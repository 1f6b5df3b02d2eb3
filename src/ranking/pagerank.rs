//! Graph centrality via weighted PageRank
//!
//! Power iteration over the candidate subgraph. Edge endpoints that are not
//! in the candidate entity list still participate in mass flow; the combiner
//! only reads candidate ids, so they never surface in results.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use crate::constants::{PAGERANK_DAMPING, PAGERANK_MAX_ITERATIONS, PAGERANK_TOLERANCE};
use crate::graph::{EntityNode, RelationshipEdge};

/// PageRank iteration parameters
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor (α): probability of following an edge versus restarting
    pub damping: f64,

    /// Iteration cap; best-effort scores are returned when it is reached
    pub max_iterations: usize,

    /// Per-node L1 convergence tolerance
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: PAGERANK_DAMPING,
            max_iterations: PAGERANK_MAX_ITERATIONS,
            tolerance: PAGERANK_TOLERANCE,
        }
    }
}

/// Compute PageRank scores for the candidate subgraph
///
/// Returns an empty map for an empty or edge-less candidate set: a normal,
/// common input, not a failure. Parallel edges between the same pair each
/// contribute their own weight.
pub fn pagerank_scores(
    entities: &[EntityNode],
    relationships: &[RelationshipEdge],
    config: &PageRankConfig,
) -> HashMap<Uuid, f64> {
    if entities.is_empty() || relationships.is_empty() {
        return HashMap::new();
    }

    // Node set: candidate entities plus any edge endpoints outside them
    let mut nodes: Vec<Uuid> = Vec::with_capacity(entities.len());
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(entities.len());
    for entity in entities {
        if seen.insert(entity.id) {
            nodes.push(entity.id);
        }
    }
    for edge in relationships {
        if seen.insert(edge.from_entity) {
            nodes.push(edge.from_entity);
        }
        if seen.insert(edge.to_entity) {
            nodes.push(edge.to_entity);
        }
    }

    let n = nodes.len();
    let uniform = 1.0 / n as f64;

    // Weighted adjacency and per-source total outgoing weight
    let mut out_weight: HashMap<Uuid, f64> = HashMap::with_capacity(n);
    let mut links: Vec<(Uuid, Uuid, f64)> = Vec::with_capacity(relationships.len());
    for edge in relationships {
        let w = edge.effective_weight();
        *out_weight.entry(edge.from_entity).or_insert(0.0) += w;
        links.push((edge.from_entity, edge.to_entity, w));
    }

    let mut scores: HashMap<Uuid, f64> = nodes.iter().map(|&id| (id, uniform)).collect();
    let base = (1.0 - config.damping) / n as f64;

    for iteration in 0..config.max_iterations {
        // Mass held by nodes with no outgoing edges is redistributed uniformly
        let dangling: f64 = nodes
            .iter()
            .filter(|id| !out_weight.contains_key(id))
            .map(|id| scores[id])
            .sum();
        let dangling_share = config.damping * dangling / n as f64;

        let mut next: HashMap<Uuid, f64> =
            nodes.iter().map(|&id| (id, base + dangling_share)).collect();

        for &(from, to, w) in &links {
            let contribution = config.damping * scores[&from] * w / out_weight[&from];
            if let Some(score) = next.get_mut(&to) {
                *score += contribution;
            }
        }

        let l1: f64 = nodes.iter().map(|id| (next[id] - scores[id]).abs()).sum();
        scores = next;

        if l1 < n as f64 * config.tolerance {
            debug!(iterations = iteration + 1, nodes = n, "PageRank converged");
            return scores;
        }
    }

    debug!(
        iterations = config.max_iterations,
        nodes = n,
        "PageRank hit iteration cap, returning best-effort scores"
    );
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(n: u128) -> EntityNode {
        let mut e = EntityNode::new(format!("e{n}"));
        e.id = Uuid::from_u128(n);
        e
    }

    fn edge(from: u128, to: u128, weight: f32) -> RelationshipEdge {
        let mut e = RelationshipEdge::new(Uuid::from_u128(from), Uuid::from_u128(to), "links");
        e.weight = weight;
        e
    }

    #[test]
    fn test_empty_candidate_set() {
        let scores = pagerank_scores(&[], &[], &PageRankConfig::default());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_edgeless_candidate_set() {
        let scores = pagerank_scores(
            &[entity(1), entity(2)],
            &[],
            &PageRankConfig::default(),
        );
        assert!(scores.is_empty());
    }

    #[test]
    fn test_chain_matches_reference_fixed_point() {
        // A -> B -> C at α = 0.85 converges to the analytic fixed point
        // A = 400/2169, B = 740/2169, C = 1029/2169
        let entities = vec![entity(1), entity(2), entity(3)];
        let edges = vec![edge(1, 2, 1.0), edge(2, 3, 1.0)];
        let scores = pagerank_scores(&entities, &edges, &PageRankConfig::default());

        assert!((scores[&Uuid::from_u128(1)] - 400.0 / 2169.0).abs() < 1e-4);
        assert!((scores[&Uuid::from_u128(2)] - 740.0 / 2169.0).abs() < 1e-4);
        assert!((scores[&Uuid::from_u128(3)] - 1029.0 / 2169.0).abs() < 1e-4);
    }

    #[test]
    fn test_scores_sum_to_one() {
        let entities = vec![entity(1), entity(2), entity(3), entity(4)];
        let edges = vec![
            edge(1, 2, 1.0),
            edge(2, 3, 2.0),
            edge(3, 1, 0.5),
            edge(4, 1, 1.0),
        ];
        let scores = pagerank_scores(&entities, &edges, &PageRankConfig::default());
        let total: f64 = scores.values().sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heavier_inbound_weight_scores_higher() {
        // Both B and C receive from A, but C's edge carries more weight
        let entities = vec![entity(1), entity(2), entity(3)];
        let edges = vec![edge(1, 2, 1.0), edge(1, 3, 3.0)];
        let scores = pagerank_scores(&entities, &edges, &PageRankConfig::default());
        assert!(scores[&Uuid::from_u128(3)] > scores[&Uuid::from_u128(2)]);
    }

    #[test]
    fn test_non_positive_weight_defaults_to_one() {
        let entities = vec![entity(1), entity(2), entity(3)];
        let weighted = vec![edge(1, 2, 1.0), edge(1, 3, 1.0)];
        let defaulted = vec![edge(1, 2, -5.0), edge(1, 3, 0.0)];

        let a = pagerank_scores(&entities, &weighted, &PageRankConfig::default());
        let b = pagerank_scores(&entities, &defaulted, &PageRankConfig::default());
        for id in a.keys() {
            assert!((a[id] - b[id]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_phantom_endpoints_participate_but_are_scored() {
        // Edge points at an id missing from the entity list; it still gets a
        // score entry and drains mass like any node
        let entities = vec![entity(1)];
        let edges = vec![edge(1, 99, 1.0)];
        let scores = pagerank_scores(&entities, &edges, &PageRankConfig::default());
        assert_eq!(scores.len(), 2);
        assert!(scores[&Uuid::from_u128(99)] > scores[&Uuid::from_u128(1)]);
    }
}
