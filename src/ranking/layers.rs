//! Percentile-based retention layer assignment

use std::collections::HashMap;

use uuid::Uuid;

use crate::constants::{
    LAYER_IMMEDIATE_PERCENTILE, LAYER_LONG_TERM_PERCENTILE, LAYER_SHORT_TERM_PERCENTILE,
};
use crate::graph::RetentionLayer;

/// Partition a ranked sequence into retention layers by rank percentile
///
/// For the entity at zero-based rank `i` of `n`, `percentile = i / n`;
/// thresholds are checked in order (first match wins) and are half-open on
/// the lower side, so an entity at exactly 0.70 falls into the semantic
/// cluster. An empty sequence yields an empty mapping.
pub fn assign_layers(ranked: &[(Uuid, f64)]) -> HashMap<Uuid, RetentionLayer> {
    let n = ranked.len();
    let mut layers = HashMap::with_capacity(n);

    for (i, (id, _score)) in ranked.iter().enumerate() {
        let percentile = i as f64 / n as f64;
        let layer = if percentile < LAYER_IMMEDIATE_PERCENTILE {
            RetentionLayer::Immediate
        } else if percentile < LAYER_SHORT_TERM_PERCENTILE {
            RetentionLayer::ShortTerm
        } else if percentile < LAYER_LONG_TERM_PERCENTILE {
            RetentionLayer::LongTerm
        } else {
            RetentionLayer::SemanticCluster
        };
        layers.insert(*id, layer);
    }

    layers
}
