//! Engine facade wiring the ranking services together
//!
//! [`MemoryEngine`] owns the three service objects a ranking deployment
//! needs (the ranker, the vector index handle, and the embedding
//! capability), constructed once at startup and passed by reference into the
//! call path. `rank_query` runs the full pipeline: lexical candidate build,
//! query embedding, per-entity vectors, fusion, layer assignment.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::embeddings::EmbeddingProvider;
use crate::errors::Result;
use crate::graph::{EntityNode, RetentionLayer};
use crate::ranking::{MemoryRanker, WeightConfig};
use crate::store::{lexical_candidates, MemoryStore};
use crate::vector_index::VectorIndex;

/// One entity in a query ranking, with its fused score and retention tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub id: Uuid,
    pub score: f64,
    pub layer: RetentionLayer,
}

/// Result of a full query ranking pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRanking {
    /// Top entries in rank order, capped at the requested count
    pub entries: Vec<RankedEntry>,

    /// Size of the candidate set the ranking ran over
    pub candidate_count: usize,
}

/// Explicitly constructed engine services
pub struct MemoryEngine {
    ranker: MemoryRanker,
    index: Arc<VectorIndex>,
    provider: EmbeddingProvider,
}

impl MemoryEngine {
    /// Assemble the engine from configuration and a resolved embedding
    /// capability
    ///
    /// The vector index opens against the configured storage directory when
    /// one is set (loading any persisted pair found there) and stays purely
    /// in memory otherwise.
    pub fn new(config: EngineConfig, provider: EmbeddingProvider) -> Self {
        let index = match &config.index.storage_dir {
            Some(dir) => VectorIndex::open(dir),
            None => VectorIndex::new(),
        };
        Self {
            ranker: MemoryRanker::new(config.ranking),
            index: Arc::new(index),
            provider,
        }
    }

    pub fn ranker(&self) -> &MemoryRanker {
        &self.ranker
    }

    pub fn vector_index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    pub fn embedding_provider(&self) -> &EmbeddingProvider {
        &self.provider
    }

    /// Embed an entity's display text and add it to the vector index
    ///
    /// The add-on-insert half of index maintenance; returns `false` when the
    /// provider is absent or declined the text, which is not an error.
    pub fn index_entity(&self, entity: &EntityNode) -> Result<bool> {
        match self.provider.embed(&entity.name) {
            Some(vector) => {
                self.index.add(entity.id, vector)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Rebuild the vector index from every entity the store holds
    pub fn rebuild_index(&self, store: &dyn MemoryStore, limit: usize) -> Result<usize> {
        let entities = store
            .list_all_entities(limit)
            .map_err(crate::errors::EngineError::from)?;
        let items: Vec<(Uuid, String)> = entities
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();
        self.index.rebuild(&items, |text| self.provider.embed(text))
    }

    /// Rank the store's lexical matches for a query and assign layers
    pub fn rank_query(
        &self,
        store: &dyn MemoryStore,
        query_text: &str,
        top_k: usize,
        weights: &WeightConfig,
    ) -> Result<QueryRanking> {
        let candidates = lexical_candidates(store, query_text, top_k)
            .map_err(crate::errors::EngineError::from)?;

        if candidates.is_empty() {
            return Ok(QueryRanking {
                entries: Vec::new(),
                candidate_count: 0,
            });
        }

        // Query and per-entity vectors both degrade to absence: a disabled
        // provider simply leaves the semantic signal empty
        let query_vector = self.provider.embed(query_text);
        let entity_vectors: HashMap<Uuid, Vec<f32>> = candidates
            .entities
            .iter()
            .filter_map(|e| self.provider.embed(&e.name).map(|v| (e.id, v)))
            .collect();

        let ranked = self.ranker.rank_candidates(
            &candidates,
            query_vector.as_deref(),
            Some(&entity_vectors),
            weights,
        )?;
        let layers = self.ranker.assign_layers(&ranked);

        debug!(
            query = query_text,
            candidates = ranked.len(),
            returned = top_k.min(ranked.len()),
            "Ranked query candidates"
        );

        let entries = ranked
            .iter()
            .take(top_k)
            .map(|&(id, score)| RankedEntry {
                id,
                score,
                layer: layers[&id],
            })
            .collect();

        Ok(QueryRanking {
            entries,
            candidate_count: ranked.len(),
        })
    }
}
