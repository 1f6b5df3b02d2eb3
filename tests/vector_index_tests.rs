//! Vector Index Tests
//!
//! Tests for the nearest-neighbor index contract:
//! - Search ordering, similarity formula and insertion-order ties
//! - Rebuild semantics (clear + reinsert in input order, atomic swap)
//! - Paired-artifact persistence and the corruption path
//! - Disabled-index degradation

use contextcache_memory::uuid::Uuid;
use contextcache_memory::VectorIndex;
use tempfile::TempDir;

fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Populate an index with axis-aligned vectors under deterministic ids
fn populated_index(count: u128) -> VectorIndex {
    let index = VectorIndex::new();
    for n in 1..=count {
        index.add(id(n), vec![n as f32, 0.0]).unwrap();
    }
    index
}

#[test]
fn search_returns_nearest_first_with_similarity() {
    let index = populated_index(5);

    let hits = index.search(&[2.2, 0.0], 3);
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].0, id(2));
    assert_eq!(hits[1].0, id(3));

    // similarity = 1 / (1 + squared distance)
    let expected = 1.0 / (1.0 + 0.2f32 * 0.2);
    assert!((hits[0].1 - expected).abs() < 1e-5);
    assert!(hits[0].1 > hits[1].1);
}

#[test]
fn equidistant_entries_keep_insertion_order() {
    let index = VectorIndex::new();
    index.add(id(40), vec![0.0, 2.0]).unwrap();
    index.add(id(10), vec![2.0, 0.0]).unwrap();
    index.add(id(30), vec![0.0, -2.0]).unwrap();

    let hits = index.search(&[0.0, 0.0], 3);
    let order: Vec<Uuid> = hits.iter().map(|(i, _)| *i).collect();
    assert_eq!(order, vec![id(40), id(10), id(30)]);
}

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let index = populated_index(4);
    index.save(dir.path()).unwrap();

    let restored = VectorIndex::new();
    restored.load(dir.path()).unwrap();
    assert_eq!(restored.len(), 4);

    let hits = restored.search(&[3.0, 0.0], 1);
    assert_eq!(hits[0].0, id(3));
}

#[test]
fn open_restores_persisted_pair() {
    let dir = TempDir::new().expect("temp dir");
    populated_index(3).save(dir.path()).unwrap();

    let index = VectorIndex::open(dir.path());
    assert!(index.is_enabled());
    assert_eq!(index.len(), 3);
}

#[test]
fn open_with_empty_dir_starts_empty_and_enabled() {
    let dir = TempDir::new().expect("temp dir");
    let index = VectorIndex::open(dir.path());
    assert!(index.is_enabled());
    assert!(index.is_empty());
}

#[test]
fn length_mismatch_disables_index_as_corrupted() {
    let big = TempDir::new().expect("temp dir");
    let small = TempDir::new().expect("temp dir");
    populated_index(3).save(big.path()).unwrap();
    populated_index(2).save(small.path()).unwrap();

    // Swap in an id list that disagrees with the vector table
    std::fs::copy(
        small.path().join("vector_ids.bin"),
        big.path().join("vector_ids.bin"),
    )
    .unwrap();

    let index = VectorIndex::new();
    let err = index.load(big.path()).unwrap_err();
    assert_eq!(err.code(), "INDEX_CORRUPTED");

    // Disabled for the process lifetime: queries fail empty, writes loudly
    assert!(!index.is_enabled());
    assert!(index.disabled_reason().is_some());
    assert!(index.search(&[1.0, 0.0], 5).is_empty());
    assert_eq!(
        index.add(id(9), vec![1.0, 0.0]).unwrap_err().code(),
        "INDEX_UNAVAILABLE"
    );
}

#[test]
fn open_on_corrupted_pair_yields_disabled_index() {
    let big = TempDir::new().expect("temp dir");
    let small = TempDir::new().expect("temp dir");
    populated_index(3).save(big.path()).unwrap();
    populated_index(1).save(small.path()).unwrap();
    std::fs::copy(
        small.path().join("vector_ids.bin"),
        big.path().join("vector_ids.bin"),
    )
    .unwrap();

    let index = VectorIndex::open(big.path());
    assert!(!index.is_enabled());
    assert!(index.search(&[1.0, 0.0], 5).is_empty());
}

#[test]
fn rebuild_clears_and_reinserts_in_input_order() {
    let index = populated_index(5);

    let items: Vec<(Uuid, String)> = vec![
        (id(100), "aa".to_string()),
        (id(200), "bbbb".to_string()),
    ];
    let inserted = index
        .rebuild(&items, |text| Some(vec![text.len() as f32, 0.0]))
        .unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(index.len(), 2);
    let hits = index.search(&[2.0, 0.0], 2);
    assert_eq!(hits[0].0, id(100));
}

#[test]
fn rebuild_skips_declined_texts() {
    let index = VectorIndex::new();
    let items: Vec<(Uuid, String)> = (1..=4)
        .map(|n| (id(n), format!("text-{n}")))
        .collect();

    let inserted = index
        .rebuild(&items, |text| {
            if text.ends_with('2') {
                None
            } else {
                Some(vec![1.0])
            }
        })
        .unwrap();
    assert_eq!(inserted, 3);
}

#[test]
fn failed_rebuild_leaves_previous_contents_intact() {
    let index = populated_index(3);

    // Mixed dimensions abort the rebuild before the swap
    let items: Vec<(Uuid, String)> = vec![
        (id(100), "a".to_string()),
        (id(200), "bb".to_string()),
    ];
    let err = index
        .rebuild(&items, |text| Some(vec![0.5; text.len()]))
        .unwrap_err();
    assert_eq!(err.code(), "DIMENSION_MISMATCH");

    assert_eq!(index.len(), 3);
    assert_eq!(index.search(&[1.0, 0.0], 1)[0].0, id(1));
}

#[test]
fn save_then_reload_preserves_insertion_order_ties() {
    let dir = TempDir::new().expect("temp dir");
    let index = VectorIndex::new();
    index.add(id(50), vec![1.0, 0.0]).unwrap();
    index.add(id(20), vec![-1.0, 0.0]).unwrap();
    index.save(dir.path()).unwrap();

    let restored = VectorIndex::open(dir.path());
    let hits = restored.search(&[0.0, 0.0], 2);
    assert_eq!(hits[0].0, id(50));
    assert_eq!(hits[1].0, id(20));
}
