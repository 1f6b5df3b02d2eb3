//! Candidate graph data model
//!
//! Read-only snapshots of entities and relationships as supplied by the
//! external graph store, plus the candidate subgraph container one ranking
//! invocation operates on. The engine never fetches more data than a
//! `CandidateSet` carries and never writes these records back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Retention tier assigned from rank percentile
///
/// The store may persist a layer tag on an edge independently; the engine's
/// ranked output supersedes it for ranking purposes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RetentionLayer {
    Immediate,
    ShortTerm,
    LongTerm,
    SemanticCluster,
}

impl RetentionLayer {
    /// Get string representation of the retention layer
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
            Self::SemanticCluster => "semantic_cluster",
        }
    }
}

/// Entity node in the candidate graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityNode {
    /// Unique, stable identifier
    pub id: Uuid,

    /// Display text (e.g., "John", "Paris", "Rust programming")
    pub name: String,

    /// Category tag (e.g., "person", "location"); schema-light by design
    #[serde(default)]
    pub category: Option<String>,

    /// Free-form attribute map; boundary data only, scoring never reads it
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// When this entity was created in the store
    ///
    /// Lenient: a malformed or missing timestamp deserializes to `None`
    /// instead of failing the record. The recency scorer treats `None` as
    /// "no decay" so one bad record never aborts ranking.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    /// When this entity was last updated in the store
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EntityNode {
    /// Create an entity snapshot with a fresh id and current timestamps
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: None,
            attributes: HashMap::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Relationship edge between entities
///
/// Directed; multiple edges between the same pair with different verbs are
/// permitted. Only the endpoints and the numeric weight feed scoring; verb,
/// polarity, layer tag and metadata ride along for the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Unique identifier for this edge
    pub id: Uuid,

    /// Source entity id
    pub from_entity: Uuid,

    /// Target entity id
    pub to_entity: Uuid,

    /// Relationship label (verb)
    pub verb: String,

    /// Numeric weight; non-positive values are treated as 1.0 by the
    /// centrality scorer
    #[serde(default = "default_weight")]
    pub weight: f32,

    /// Retention layer tag persisted by the store, if any
    #[serde(default = "default_layer")]
    pub layer: Option<RetentionLayer>,

    /// Polarity in [-1, 1]: negative relationships carry negative polarity
    #[serde(default = "default_polarity")]
    pub polarity: f32,

    /// When this relationship was created
    pub created_at: DateTime<Utc>,

    /// Free-form metadata; boundary data only
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

fn default_weight() -> f32 {
    1.0
}

fn default_polarity() -> f32 {
    1.0
}

fn default_layer() -> Option<RetentionLayer> {
    Some(RetentionLayer::Immediate)
}

impl RelationshipEdge {
    /// Create an edge with default weight, polarity and layer tag
    pub fn new(from_entity: Uuid, to_entity: Uuid, verb: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_entity,
            to_entity,
            verb: verb.into(),
            weight: default_weight(),
            layer: default_layer(),
            polarity: default_polarity(),
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Edge weight as used by the centrality scorer
    ///
    /// Absent weights deserialize to 1.0; non-positive values fall back to
    /// 1.0 as well, so a zero or negative weight never drops an edge.
    pub fn effective_weight(&self) -> f64 {
        if self.weight > 0.0 {
            self.weight as f64
        } else {
            1.0
        }
    }
}

/// A finite, caller-supplied subgraph: one ranking invocation's entire input
///
/// Edge endpoints are drawn from, but not required to be fully contained in,
/// the entity list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateSet {
    /// Entity snapshots to rank
    pub entities: Vec<EntityNode>,

    /// Relationships among (or touching) those entities
    pub relationships: Vec<RelationshipEdge>,
}

/// Node/edge counts for a candidate set, tallied per layer tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateStats {
    pub entity_count: usize,
    pub relationship_count: usize,
    pub edges_per_layer: HashMap<String, usize>,
}

impl CandidateSet {
    pub fn new(entities: Vec<EntityNode>, relationships: Vec<RelationshipEdge>) -> Self {
        Self {
            entities,
            relationships,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Candidate entity ids in input order, first occurrence wins
    pub fn entity_ids(&self) -> Vec<Uuid> {
        let mut seen = std::collections::HashSet::new();
        self.entities
            .iter()
            .filter(|e| seen.insert(e.id))
            .map(|e| e.id)
            .collect()
    }

    /// Count node/edge totals and the per-layer edge tally
    pub fn stats(&self) -> CandidateStats {
        let mut edges_per_layer: HashMap<String, usize> = HashMap::new();
        for edge in &self.relationships {
            if let Some(layer) = edge.layer {
                *edges_per_layer.entry(layer.as_str().to_string()).or_insert(0) += 1;
            }
        }
        CandidateStats {
            entity_count: self.entities.len(),
            relationship_count: self.relationships.len(),
            edges_per_layer,
        }
    }
}

/// Deserialize a timestamp leniently: RFC 3339 strings parse, anything else
/// (missing, null, malformed) becomes `None` with a warning
///
/// A distinct, logged outcome per record keeps timestamp corruption
/// diagnosable even though the overall policy stays fail-open.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => match DateTime::parse_from_rfc3339(&s) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(err) => {
                tracing::warn!(timestamp = %s, %err, "Unparseable timestamp, falling back to none");
                None
            }
        },
        Some(serde_json::Value::Null) | None => None,
        Some(other) => {
            tracing::warn!(value = %other, "Non-string timestamp, falling back to none");
            None
        }
    })
}
