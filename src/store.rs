//! Graph store boundary and candidate set assembly
//!
//! The durable graph store is an external collaborator: the engine consumes
//! its lookup operations through [`MemoryStore`] and never reaches past the
//! candidate set those lookups produce. [`InMemoryStore`] is a lightweight
//! implementation for tests and embedded use.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use tracing::debug;
use uuid::Uuid;

use crate::constants::CANDIDATE_OVERFETCH_FACTOR;
use crate::graph::{CandidateSet, EntityNode, RelationshipEdge};

/// Lookup operations consumed from the durable graph store
pub trait MemoryStore: Send + Sync {
    /// Entities whose display text matches `text`, case-insensitively
    fn find_entities_by_lexical_match(&self, text: &str, limit: usize)
        -> Result<Vec<EntityNode>>;

    /// Relationships where the entity appears as source or target
    fn find_relationships_touching(&self, entity_id: Uuid) -> Result<Vec<RelationshipEdge>>;

    /// Up to `limit` entities, for full-graph ranking
    fn list_all_entities(&self, limit: usize) -> Result<Vec<EntityNode>>;

    /// Up to `limit` relationships, for full-graph ranking
    fn list_all_relationships(&self, limit: usize) -> Result<Vec<RelationshipEdge>>;
}

/// Build a candidate set from a lexical pre-filter
///
/// Retrieves up to `top_k × 3` matching entities plus every relationship
/// touching them (deduplicated by edge id, since one edge can touch two matched
/// entities). Capping candidate size here, rather than cancelling
/// mid-computation, is how ranking cost stays bounded.
pub fn lexical_candidates(
    store: &dyn MemoryStore,
    text: &str,
    top_k: usize,
) -> Result<CandidateSet> {
    let limit = top_k.saturating_mul(CANDIDATE_OVERFETCH_FACTOR);
    let entities = store.find_entities_by_lexical_match(text, limit)?;

    let mut seen_edges = HashSet::new();
    let mut relationships = Vec::new();
    for entity in &entities {
        for edge in store.find_relationships_touching(entity.id)? {
            if seen_edges.insert(edge.id) {
                relationships.push(edge);
            }
        }
    }

    debug!(
        query = text,
        entities = entities.len(),
        relationships = relationships.len(),
        "Built lexical candidate set"
    );
    Ok(CandidateSet::new(entities, relationships))
}

/// Build a candidate set over the whole graph, bounded by `limit`
pub fn full_graph_candidates(store: &dyn MemoryStore, limit: usize) -> Result<CandidateSet> {
    let entities = store.list_all_entities(limit)?;
    let relationships = store.list_all_relationships(limit)?;

    debug!(
        entities = entities.len(),
        relationships = relationships.len(),
        "Built full-graph candidate set"
    );
    Ok(CandidateSet::new(entities, relationships))
}

/// In-memory graph store for tests and embedded use
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entities: Vec<EntityNode>,
    relationships: Vec<RelationshipEdge>,
    by_id: HashMap<Uuid, usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity snapshot, replacing any previous one with the same id
    pub fn add_entity(&mut self, entity: EntityNode) {
        match self.by_id.get(&entity.id) {
            Some(&i) => self.entities[i] = entity,
            None => {
                self.by_id.insert(entity.id, self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    pub fn add_relationship(&mut self, edge: RelationshipEdge) {
        self.relationships.push(edge);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

impl MemoryStore for InMemoryStore {
    fn find_entities_by_lexical_match(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<EntityNode>> {
        let needle = text.to_lowercase();
        Ok(self
            .entities
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    fn find_relationships_touching(&self, entity_id: Uuid) -> Result<Vec<RelationshipEdge>> {
        Ok(self
            .relationships
            .iter()
            .filter(|r| r.from_entity == entity_id || r.to_entity == entity_id)
            .cloned()
            .collect())
    }

    fn list_all_entities(&self, limit: usize) -> Result<Vec<EntityNode>> {
        Ok(self.entities.iter().take(limit).cloned().collect())
    }

    fn list_all_relationships(&self, limit: usize) -> Result<Vec<RelationshipEdge>> {
        Ok(self.relationships.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_chain() -> (InMemoryStore, Uuid, Uuid, Uuid) {
        let mut store = InMemoryStore::new();
        let alice = EntityNode::new("Alice");
        let bob = EntityNode::new("Bob");
        let carol = EntityNode::new("Carol");
        let (a, b, c) = (alice.id, bob.id, carol.id);

        store.add_entity(alice);
        store.add_entity(bob);
        store.add_entity(carol);
        store.add_relationship(RelationshipEdge::new(a, b, "knows"));
        store.add_relationship(RelationshipEdge::new(b, c, "knows"));
        (store, a, b, c)
    }

    #[test]
    fn test_lexical_match_is_case_insensitive() {
        let (store, a, _, _) = store_with_chain();
        let hits = store.find_entities_by_lexical_match("ali", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a);
    }

    #[test]
    fn test_relationships_touching_covers_both_directions() {
        let (store, _, b, _) = store_with_chain();
        let edges = store.find_relationships_touching(b).unwrap();
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_lexical_candidates_dedup_edges() {
        let (store, _, _, _) = store_with_chain();
        // "o" matches Bob and Carol; the B->C edge touches both but must
        // appear once
        let set = lexical_candidates(&store, "o", 10).unwrap();
        assert_eq!(set.entities.len(), 2);
        assert_eq!(set.relationships.len(), 2);
    }

    #[test]
    fn test_full_graph_candidates_respects_limit() {
        let (store, _, _, _) = store_with_chain();
        let set = full_graph_candidates(&store, 2).unwrap();
        assert_eq!(set.entities.len(), 2);
    }

    #[test]
    fn test_replacing_entity_keeps_count() {
        let (mut store, a, _, _) = store_with_chain();
        let mut updated = EntityNode::new("Alice Updated");
        updated.id = a;
        store.add_entity(updated);
        assert_eq!(store.entity_count(), 3);
    }
}
