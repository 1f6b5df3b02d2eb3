//! Configuration management for the ranking engine
//!
//! All configurable parameters in one place with environment variable
//! overrides. Sensible defaults, configurable in production.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use crate::constants::{
    PAGERANK_DAMPING, PAGERANK_MAX_ITERATIONS, PAGERANK_TOLERANCE, RECENCY_BASE_SCORE,
    TIME_DECAY_FACTOR,
};
use crate::ranking::{PageRankConfig, WeightConfig};

/// Parse an environment variable, warning on malformed values
fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

/// Ranking parameters: signal weights plus per-scorer tunables
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Default signal weights for callers that do not supply their own
    pub weights: WeightConfig,

    /// PageRank damping factor (α)
    pub damping: f64,

    /// PageRank iteration cap
    pub max_iterations: usize,

    /// PageRank per-node convergence tolerance
    pub tolerance: f64,

    /// Per-day multiplicative recency decay
    pub time_decay_factor: f64,

    /// Recency score before decay (and the malformed-timestamp fallback)
    pub recency_base_score: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            damping: PAGERANK_DAMPING,
            max_iterations: PAGERANK_MAX_ITERATIONS,
            tolerance: PAGERANK_TOLERANCE,
            time_decay_factor: TIME_DECAY_FACTOR,
            recency_base_score: RECENCY_BASE_SCORE,
        }
    }
}

impl RankingConfig {
    /// Load from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = parse_env("CONTEXTCACHE_PAGERANK_DAMPING") {
            config.damping = v;
        }
        if let Some(v) = parse_env("CONTEXTCACHE_PAGERANK_MAX_ITERATIONS") {
            config.max_iterations = v;
        }
        if let Some(v) = parse_env("CONTEXTCACHE_TIME_DECAY_FACTOR") {
            config.time_decay_factor = v;
        }
        if let Some(v) = parse_env("CONTEXTCACHE_WEIGHT_PAGERANK") {
            config.weights.pagerank = v;
        }
        if let Some(v) = parse_env("CONTEXTCACHE_WEIGHT_SEMANTIC") {
            config.weights.semantic = v;
        }
        if let Some(v) = parse_env("CONTEXTCACHE_WEIGHT_TIME") {
            config.weights.time = v;
        }
        if let Some(v) = parse_env("CONTEXTCACHE_WEIGHT_DEGREE") {
            config.weights.degree = v;
        }

        config
    }

    /// Iteration parameters for the centrality scorer
    pub fn pagerank(&self) -> PageRankConfig {
        PageRankConfig {
            damping: self.damping,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Default)]
pub struct IndexConfig {
    /// Storage directory for the persisted artifact pair; `None` keeps the
    /// index purely in memory
    pub storage_dir: Option<PathBuf>,
}

impl IndexConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self {
            storage_dir: env::var("CONTEXTCACHE_INDEX_DIR").ok().map(PathBuf::from),
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub ranking: RankingConfig,
    pub index: IndexConfig,
}

impl EngineConfig {
    /// Load everything from the environment and log the effective settings
    pub fn from_env() -> Self {
        let config = Self {
            ranking: RankingConfig::from_env(),
            index: IndexConfig::from_env(),
        };
        config.log_summary();
        config
    }

    fn log_summary(&self) {
        info!(
            damping = self.ranking.damping,
            max_iterations = self.ranking.max_iterations,
            time_decay_factor = self.ranking.time_decay_factor,
            weight_pagerank = self.ranking.weights.pagerank,
            weight_semantic = self.ranking.weights.semantic,
            weight_time = self.ranking.weights.time,
            weight_degree = self.ranking.weights.degree,
            index_dir = ?self.index.storage_dir,
            "Engine configuration loaded"
        );
    }
}
