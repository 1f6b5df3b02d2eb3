//! Hybrid memory ranking
//!
//! Fuses four signals over one candidate subgraph into a single deterministic
//! total order:
//! - Graph structural importance (weighted PageRank)
//! - Semantic similarity against an optional query vector
//! - Recency with exponential time decay
//! - Normalized degree centrality
//!
//! The four scorers run independently over the same candidate set; the
//! combiner fuses their score maps under a normalized weight configuration,
//! and the layer assigner partitions the result into retention tiers. A
//! ranking invocation is a pure function of its inputs with no hidden state, so
//! identical inputs produce identical output.

pub mod degree;
pub mod layers;
pub mod pagerank;
pub mod recency;
pub mod semantic;

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::RankingConfig;
use crate::constants::{
    DEFAULT_DEGREE_WEIGHT, DEFAULT_PAGERANK_WEIGHT, DEFAULT_SEMANTIC_WEIGHT, DEFAULT_TIME_WEIGHT,
};
use crate::errors::{EngineError, Result};
use crate::graph::{CandidateSet, EntityNode, RelationshipEdge, RetentionLayer};

pub use degree::degree_scores;
pub use layers::assign_layers;
pub use pagerank::{pagerank_scores, PageRankConfig};
pub use recency::{recency_scores, time_decay_score};
pub use semantic::semantic_scores;

/// Weights for the four ranking signals
///
/// Non-negative; normalized to sum to 1.0 before fusion. Supplying all four
/// as zero is a valid degenerate configuration: normalization is skipped and
/// every fused score is 0, so all entities tie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Weight for graph centrality (PageRank)
    #[serde(default = "default_pagerank_weight")]
    pub pagerank: f64,

    /// Weight for semantic similarity
    #[serde(default = "default_semantic_weight")]
    pub semantic: f64,

    /// Weight for recency decay
    #[serde(default = "default_time_weight")]
    pub time: f64,

    /// Weight for degree centrality
    #[serde(default = "default_degree_weight")]
    pub degree: f64,
}

fn default_pagerank_weight() -> f64 {
    DEFAULT_PAGERANK_WEIGHT
}

fn default_semantic_weight() -> f64 {
    DEFAULT_SEMANTIC_WEIGHT
}

fn default_time_weight() -> f64 {
    DEFAULT_TIME_WEIGHT
}

fn default_degree_weight() -> f64 {
    DEFAULT_DEGREE_WEIGHT
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            pagerank: DEFAULT_PAGERANK_WEIGHT,
            semantic: DEFAULT_SEMANTIC_WEIGHT,
            time: DEFAULT_TIME_WEIGHT,
            degree: DEFAULT_DEGREE_WEIGHT,
        }
    }
}

impl WeightConfig {
    /// Reject invalid weights at the API boundary
    ///
    /// The combiner itself assumes non-negative finite weights.
    pub fn validate(&self) -> Result<()> {
        for (signal, value) in [
            ("pagerank", self.pagerank),
            ("semantic", self.semantic),
            ("time", self.time),
            ("degree", self.degree),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidWeight { signal, value });
            }
        }
        Ok(())
    }

    /// Sum of the four weights
    pub fn total(&self) -> f64 {
        self.pagerank + self.semantic + self.time + self.degree
    }

    /// Normalize weights to sum to 1.0
    ///
    /// An all-zero tuple normalizes to all zeros (fusion then yields a
    /// uniform 0 score). Assumes `validate` has already run.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total > 0.0 {
            Self {
                pagerank: self.pagerank / total,
                semantic: self.semantic / total,
                time: self.time / total,
                degree: self.degree / total,
            }
        } else {
            Self {
                pagerank: 0.0,
                semantic: 0.0,
                time: 0.0,
                degree: 0.0,
            }
        }
    }
}

/// Hybrid memory ranker: the engine's score combiner
///
/// Constructed once at process startup and passed by reference into the
/// ranking call path, never looked up through a global. Holds only configuration, so `rank`
/// stays a pure function of its arguments.
pub struct MemoryRanker {
    config: RankingConfig,
}

impl Default for MemoryRanker {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl MemoryRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank candidate entities by fusing the four signals
    ///
    /// Returns every candidate entity id exactly once, ordered by fused score
    /// descending with ties broken by ascending entity id. Signals absent for
    /// an entity contribute nothing to its fused score; in full degradation
    /// (all score maps empty) the result degenerates to a stable-by-id
    /// ordering rather than an error.
    pub fn rank(
        &self,
        entities: &[EntityNode],
        relationships: &[RelationshipEdge],
        query_vector: Option<&[f32]>,
        entity_vectors: Option<&HashMap<Uuid, Vec<f32>>>,
        weights: &WeightConfig,
    ) -> Result<Vec<(Uuid, f64)>> {
        weights.validate()?;
        let weights = weights.normalized();

        let pagerank = pagerank_scores(entities, relationships, &self.config.pagerank());
        let degree = degree_scores(relationships);
        let time = recency_scores(
            entities,
            Utc::now(),
            self.config.time_decay_factor,
            self.config.recency_base_score,
        );
        let empty = HashMap::new();
        let semantic = semantic_scores(query_vector, entity_vectors.unwrap_or(&empty));

        debug!(
            candidates = entities.len(),
            pagerank_scored = pagerank.len(),
            degree_scored = degree.len(),
            semantic_scored = semantic.len(),
            "Fusing ranking signals"
        );

        // One fused entry per candidate entity, first occurrence of an id wins
        let mut seen = std::collections::HashSet::with_capacity(entities.len());
        let mut ranked: Vec<(Uuid, f64)> = entities
            .iter()
            .filter(|entity| seen.insert(entity.id))
            .map(|entity| {
                let id = entity.id;
                let mut fused = 0.0;
                if let Some(score) = pagerank.get(&id) {
                    fused += weights.pagerank * score;
                }
                if let Some(score) = semantic.get(&id) {
                    fused += weights.semantic * score;
                }
                if let Some(score) = time.get(&id) {
                    fused += weights.time * score;
                }
                if let Some(score) = degree.get(&id) {
                    fused += weights.degree * score;
                }
                (id, fused)
            })
            .collect();

        // Descending score; equal scores fall back to ascending id so the
        // total order is reproducible across invocations
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(ranked)
    }

    /// Rank a pre-assembled candidate set
    pub fn rank_candidates(
        &self,
        candidates: &CandidateSet,
        query_vector: Option<&[f32]>,
        entity_vectors: Option<&HashMap<Uuid, Vec<f32>>>,
        weights: &WeightConfig,
    ) -> Result<Vec<(Uuid, f64)>> {
        self.rank(
            &candidates.entities,
            &candidates.relationships,
            query_vector,
            entity_vectors,
            weights,
        )
    }

    /// Partition a ranked sequence into retention layers
    pub fn assign_layers(&self, ranked: &[(Uuid, f64)]) -> HashMap<Uuid, RetentionLayer> {
        layers::assign_layers(ranked)
    }
}
