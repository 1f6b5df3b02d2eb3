//! Incremental nearest-neighbor index over entity embeddings
//!
//! Exact-scan index ranked on squared Euclidean distance, reported as
//! `similarity = 1 / (1 + distance)` for stable non-negative scoring. Ties on
//! equal distance keep insertion order: the distance metric gives no further
//! signal, so first-added ranks higher.
//!
//! # Degradation
//!
//! The index is either active or disabled for the process lifetime. An
//! unusable storage directory at construction, or a corrupted persisted pair
//! on load, disables it: `search` then returns empty results instead of
//! failing, while writes report [`EngineError::IndexUnavailable`].
//!
//! # Concurrency
//!
//! Single-writer/multiple-reader via `parking_lot::RwLock`. `rebuild`
//! assembles a fresh table outside the lock and swaps it in, so a concurrent
//! `search` never observes a partially-cleared index.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{EngineError, Result};
use crate::similarity::euclidean_squared;

/// Persisted index-structure artifact (vector table)
const INDEX_FILE: &str = "vector_index.bin";

/// Persisted id-order artifact; its i-th entry owns the i-th stored vector
const IDS_FILE: &str = "vector_ids.bin";

/// Vector table half of the persisted pair
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct VectorTable {
    vectors: Vec<Vec<f32>>,
    dimension: Option<usize>,
}

#[derive(Debug)]
enum IndexState {
    Active { table: VectorTable, ids: Vec<Uuid> },
    Disabled { reason: String },
}

/// Incremental nearest-neighbor structure over entity embeddings
pub struct VectorIndex {
    state: RwLock<IndexState>,
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorIndex {
    /// Create an empty, active index
    pub fn new() -> Self {
        Self {
            state: RwLock::new(IndexState::Active {
                table: VectorTable::default(),
                ids: Vec::new(),
            }),
        }
    }

    /// Create an index backed by a storage directory, loading any persisted
    /// pair found there
    ///
    /// An unusable directory or a corrupted pair yields a disabled index, not
    /// an error: the feature is lost for the process lifetime but the caller
    /// keeps running.
    pub fn open(storage_dir: &Path) -> Self {
        if let Err(err) = std::fs::create_dir_all(storage_dir) {
            warn!(path = ?storage_dir, %err, "Vector index storage unavailable, disabling index");
            return Self::disabled(format!("storage dir {storage_dir:?} unusable: {err}"));
        }

        let index = Self::new();
        if storage_dir.join(INDEX_FILE).exists() {
            // Errors here have already transitioned the state appropriately
            if let Err(err) = index.load(storage_dir) {
                warn!(%err, "Failed to load persisted vector index");
            }
        }
        index
    }

    fn disabled(reason: String) -> Self {
        Self {
            state: RwLock::new(IndexState::Disabled { reason }),
        }
    }

    /// Whether the index is active
    pub fn is_enabled(&self) -> bool {
        matches!(&*self.state.read(), IndexState::Active { .. })
    }

    /// Why the index is disabled, if it is
    pub fn disabled_reason(&self) -> Option<String> {
        match &*self.state.read() {
            IndexState::Disabled { reason } => Some(reason.clone()),
            IndexState::Active { .. } => None,
        }
    }

    /// Number of stored vectors (0 when disabled)
    pub fn len(&self) -> usize {
        match &*self.state.read() {
            IndexState::Active { ids, .. } => ids.len(),
            IndexState::Disabled { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one embedding under an entity id
    ///
    /// The first insert fixes the index dimension; later mismatches are
    /// rejected per call without touching stored vectors.
    pub fn add(&self, id: Uuid, vector: Vec<f32>) -> Result<()> {
        let mut state = self.state.write();
        match &mut *state {
            IndexState::Disabled { reason } => {
                Err(EngineError::IndexUnavailable(reason.clone()))
            }
            IndexState::Active { table, ids } => {
                match table.dimension {
                    None => table.dimension = Some(vector.len()),
                    Some(expected) if expected != vector.len() => {
                        return Err(EngineError::DimensionMismatch {
                            expected,
                            got: vector.len(),
                        });
                    }
                    Some(_) => {}
                }
                table.vectors.push(vector);
                ids.push(id);
                Ok(())
            }
        }
    }

    /// Return up to `k` entries ordered by ascending distance, each as
    /// `(id, similarity)` with `similarity = 1 / (1 + distance)`
    ///
    /// A disabled index or a dimension-mismatched query returns an empty
    /// result rather than failing.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(Uuid, f32)> {
        let state = self.state.read();
        let (table, ids) = match &*state {
            IndexState::Active { table, ids } => (table, ids),
            IndexState::Disabled { .. } => {
                debug!("Search against disabled vector index, returning empty");
                return Vec::new();
            }
        };

        if k == 0 || ids.is_empty() {
            return Vec::new();
        }
        if let Some(dim) = table.dimension {
            if dim != query.len() {
                warn!(
                    expected = dim,
                    got = query.len(),
                    "Query dimension mismatch, returning empty"
                );
                return Vec::new();
            }
        }

        let mut scored: Vec<(usize, f32)> = table
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, euclidean_squared(query, v)))
            .collect();

        // Stable sort on distance alone keeps insertion order among ties
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        scored
            .into_iter()
            .take(k)
            .map(|(i, distance)| (ids[i], 1.0 / (1.0 + distance)))
            .collect()
    }

    /// Clear the index and reinsert `(id, text)` pairs in input order
    ///
    /// Texts the embedder declines are skipped. The fresh table is built
    /// before the swap, so failure (or a concurrent reader) never observes a
    /// half-built index. Returns the number of vectors inserted.
    pub fn rebuild<F>(&self, items: &[(Uuid, String)], embed_fn: F) -> Result<usize>
    where
        F: Fn(&str) -> Option<Vec<f32>>,
    {
        if let IndexState::Disabled { reason } = &*self.state.read() {
            return Err(EngineError::IndexUnavailable(reason.clone()));
        }

        let mut table = VectorTable::default();
        let mut ids = Vec::new();
        let mut skipped = 0usize;

        for (id, text) in items {
            let Some(vector) = embed_fn(text) else {
                skipped += 1;
                continue;
            };
            match table.dimension {
                None => table.dimension = Some(vector.len()),
                Some(expected) if expected != vector.len() => {
                    return Err(EngineError::DimensionMismatch {
                        expected,
                        got: vector.len(),
                    });
                }
                Some(_) => {}
            }
            table.vectors.push(vector);
            ids.push(*id);
        }

        let inserted = ids.len();
        info!(inserted, skipped, "Rebuilt vector index");

        let mut state = self.state.write();
        match &mut *state {
            // Disabled between the check and the swap: keep the disable sticky
            IndexState::Disabled { reason } => Err(EngineError::IndexUnavailable(reason.clone())),
            active => {
                *active = IndexState::Active { table, ids };
                Ok(inserted)
            }
        }
    }

    /// Persist the index as its paired artifacts under `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let state = self.state.read();
        let (table, ids) = match &*state {
            IndexState::Active { table, ids } => (table, ids),
            IndexState::Disabled { reason } => {
                return Err(EngineError::IndexUnavailable(reason.clone()));
            }
        };

        std::fs::create_dir_all(path)?;

        let index_file = File::create(path.join(INDEX_FILE))?;
        bincode::serialize_into(BufWriter::new(index_file), table)?;

        let ids_file = File::create(path.join(IDS_FILE))?;
        bincode::serialize_into(BufWriter::new(ids_file), ids)?;

        info!(count = ids.len(), ?path, "Saved vector index pair");
        Ok(())
    }

    /// Load the paired artifacts from `path`, replacing current contents
    ///
    /// A length disagreement between the two artifacts is corruption: the
    /// index disables itself, logs, and reports [`EngineError::IndexCorrupted`];
    /// the caller is expected to keep running with empty search results.
    pub fn load(&self, path: &Path) -> Result<()> {
        let index_file = File::open(path.join(INDEX_FILE))?;
        let table: VectorTable = bincode::deserialize_from(BufReader::new(index_file))?;

        let ids_file = File::open(path.join(IDS_FILE))?;
        let ids: Vec<Uuid> = bincode::deserialize_from(BufReader::new(ids_file))?;

        if table.vectors.len() != ids.len() {
            let err = EngineError::IndexCorrupted {
                vectors: table.vectors.len(),
                ids: ids.len(),
            };
            warn!(
                vectors = table.vectors.len(),
                ids = ids.len(),
                "Persisted vector index pair disagrees, disabling index"
            );
            *self.state.write() = IndexState::Disabled {
                reason: err.message(),
            };
            return Err(err);
        }

        let count = ids.len();
        *self.state.write() = IndexState::Active { table, ids };
        info!(count, ?path, "Loaded vector index pair");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = VectorIndex::new();
        index.add(id(1), vec![0.0, 0.0]).unwrap();
        index.add(id(2), vec![1.0, 0.0]).unwrap();
        index.add(id(3), vec![5.0, 0.0]).unwrap();

        let hits = index.search(&[0.9, 0.0], 3);
        assert_eq!(hits[0].0, id(2));
        assert_eq!(hits[1].0, id(1));
        assert_eq!(hits[2].0, id(3));
    }

    #[test]
    fn test_similarity_formula() {
        let index = VectorIndex::new();
        index.add(id(1), vec![3.0, 4.0]).unwrap();

        // distance = 25, similarity = 1 / 26
        let hits = index.search(&[0.0, 0.0], 1);
        assert!((hits[0].1 - 1.0 / 26.0).abs() < 1e-6);
    }

    #[test]
    fn test_equal_distance_keeps_insertion_order() {
        let index = VectorIndex::new();
        index.add(id(9), vec![1.0, 0.0]).unwrap();
        index.add(id(1), vec![-1.0, 0.0]).unwrap();
        index.add(id(5), vec![0.0, 1.0]).unwrap();

        let hits = index.search(&[0.0, 0.0], 3);
        assert_eq!(
            hits.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![id(9), id(1), id(5)]
        );
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let index = VectorIndex::new();
        index.add(id(1), vec![1.0, 2.0]).unwrap();
        let err = index.add(id(2), vec![1.0]).unwrap_err();
        assert_eq!(err.code(), "DIMENSION_MISMATCH");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_mismatched_query_returns_empty() {
        let index = VectorIndex::new();
        index.add(id(1), vec![1.0, 2.0]).unwrap();
        assert!(index.search(&[1.0], 1).is_empty());
    }

    #[test]
    fn test_k_larger_than_len() {
        let index = VectorIndex::new();
        index.add(id(1), vec![1.0]).unwrap();
        assert_eq!(index.search(&[0.0], 10).len(), 1);
        assert!(index.search(&[0.0], 0).is_empty());
    }

    #[test]
    fn test_disabled_index_behavior() {
        let index = VectorIndex::disabled("no backend".to_string());
        assert!(!index.is_enabled());
        assert!(index.search(&[1.0], 5).is_empty());
        let err = index.add(id(1), vec![1.0]).unwrap_err();
        assert_eq!(err.code(), "INDEX_UNAVAILABLE");
    }

    #[test]
    fn test_rebuild_replaces_contents_in_input_order() {
        let index = VectorIndex::new();
        index.add(id(7), vec![9.0]).unwrap();

        let items = vec![
            (id(1), "one".to_string()),
            (id(2), "skip".to_string()),
            (id(3), "three".to_string()),
        ];
        let inserted = index
            .rebuild(&items, |text| {
                if text == "skip" {
                    None
                } else {
                    Some(vec![text.len() as f32])
                }
            })
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(index.len(), 2);
        let hits = index.search(&[3.0], 2);
        assert_eq!(hits[0].0, id(1));
    }
}
