//! Recency scoring with exponential time decay

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::graph::EntityNode;

/// Exponential decay score for one creation timestamp
///
/// `score = base_score × decay_factor^days_elapsed`, with whole days elapsed
/// clamped to ≥ 0 so clock skew never inflates a score. A missing timestamp
/// (malformed at the boundary) falls back to `base_score` unmodified, the
/// fail-open policy that keeps one bad record from aborting ranking.
pub fn time_decay_score(
    created_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    decay_factor: f64,
    base_score: f64,
) -> f64 {
    let Some(created) = created_at else {
        debug!("Entity without creation timestamp, using base recency score");
        return base_score;
    };

    let days_elapsed = now.signed_duration_since(created).num_days().max(0);
    base_score * decay_factor.powi(days_elapsed as i32)
}

/// Recency scores for every candidate entity
///
/// Unlike the sparse centrality maps, every entity receives an entry: decay
/// applies where a timestamp exists, base score where it does not.
pub fn recency_scores(
    entities: &[EntityNode],
    now: DateTime<Utc>,
    decay_factor: f64,
    base_score: f64,
) -> HashMap<Uuid, f64> {
    entities
        .iter()
        .map(|entity| {
            (
                entity.id,
                time_decay_score(entity.created_at, now, decay_factor, base_score),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ten_day_decay() {
        let now = Utc::now();
        let score = time_decay_score(Some(now - Duration::days(10)), now, 0.95, 1.0);
        assert!((score - 0.5987).abs() < 1e-3);
    }

    #[test]
    fn test_fresh_entity_keeps_base_score() {
        let now = Utc::now();
        let score = time_decay_score(Some(now - Duration::hours(3)), now, 0.95, 1.0);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_future_timestamp_clamped() {
        let now = Utc::now();
        let score = time_decay_score(Some(now + Duration::days(30)), now, 0.95, 1.0);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_missing_timestamp_fails_open() {
        let score = time_decay_score(None, Utc::now(), 0.95, 0.8);
        assert_eq!(score, 0.8);
    }

    #[test]
    fn test_every_entity_scored() {
        let now = Utc::now();
        let mut old = EntityNode::new("old");
        old.created_at = Some(now - Duration::days(100));
        let mut unknown = EntityNode::new("unknown");
        unknown.created_at = None;

        let scores = recency_scores(&[old.clone(), unknown.clone()], now, 0.95, 1.0);
        assert_eq!(scores.len(), 2);
        assert!(scores[&old.id] < scores[&unknown.id]);
    }
}
