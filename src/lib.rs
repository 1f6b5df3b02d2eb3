//! ContextCache Memory Library
//!
//! Hybrid memory ranking engine for knowledge-graph retrieval.
//!
//! # Key Features
//! - Deterministic fusion of four ranking signals: graph centrality
//!   (PageRank), semantic similarity, recency decay, degree centrality
//! - Percentile-based partition of ranked entities into four retention tiers
//! - Incremental vector index with paired-artifact persistence
//! - Fail-open degradation: malformed timestamps, missing embeddings and
//!   empty graphs lower a signal instead of aborting the ranking
//!
//! # Boundaries
//! - The durable graph store is consumed through the `store::MemoryStore`
//!   trait; the engine never fetches beyond the candidate set it is given
//! - Embeddings come from an external provider behind `embeddings::Embedder`,
//!   resolved once at construction into a present-or-absent capability

pub mod config;
pub mod constants;
pub mod embeddings;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod ranking;
pub mod similarity;
pub mod store;
pub mod vector_index;

// Re-export dependencies to ensure tests/benchmarks use the same version
pub use chrono;
pub use parking_lot;
pub use uuid;

pub use config::{EngineConfig, IndexConfig, RankingConfig};
pub use embeddings::{Embedder, EmbeddingProvider};
pub use engine::{MemoryEngine, QueryRanking, RankedEntry};
pub use errors::{EngineError, Result};
pub use graph::{CandidateSet, EntityNode, RelationshipEdge, RetentionLayer};
pub use ranking::{MemoryRanker, WeightConfig};
pub use store::{InMemoryStore, MemoryStore};
pub use vector_index::VectorIndex;
