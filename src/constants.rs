//! Documented constants for the ranking engine
//!
//! All tunable parameters in one place with justification for their values.
//! Centralizing constants prevents magic numbers and makes tuning easier.

// =============================================================================
// GRAPH CENTRALITY CONSTANTS
// PageRank over the candidate subgraph is the dominant ranking cost; these
// values bound both its accuracy and its runtime.
// =============================================================================

/// PageRank damping factor (α)
///
/// Probability of following an edge versus restarting at a random node.
///
/// Justification:
/// - 0.85 is the canonical value from the original PageRank paper
/// - Higher values weight graph structure more heavily but converge slower
/// - Matches the default used by networkx and most graph libraries, so scores
///   are comparable against reference computations
pub const PAGERANK_DAMPING: f64 = 0.85;

/// Maximum power-iteration rounds before returning best-effort scores
///
/// Justification:
/// - 100 iterations converges well past 1e-6 tolerance for candidate sets up
///   to millions of edges at α = 0.85
/// - Acts as a bounded-time safety valve: a pathological candidate set can
///   never stall a ranking invocation indefinitely
pub const PAGERANK_MAX_ITERATIONS: usize = 100;

/// Per-node convergence tolerance for PageRank
///
/// Iteration stops when the L1 change across all nodes falls below
/// `N * PAGERANK_TOLERANCE`.
///
/// Justification:
/// - 1e-6 per node keeps centrality error far below the 1e-4 accuracy the
///   engine promises against reference computations
pub const PAGERANK_TOLERANCE: f64 = 1e-6;

// =============================================================================
// RECENCY DECAY CONSTANTS
// =============================================================================

/// Per-day multiplicative decay applied to recency scores
///
/// `score = base × decay^days_elapsed`
///
/// Justification:
/// - 0.95 halves a memory's recency score in ~13.5 days (0.95^13.5 ≈ 0.5),
///   a forgetting horizon that keeps week-old context competitive while
///   clearly demoting month-old context (0.95^30 ≈ 0.21)
pub const TIME_DECAY_FACTOR: f64 = 0.95;

/// Base recency score before decay is applied
///
/// Entities with a missing or unparseable creation timestamp receive this
/// value unmodified: a single malformed record never aborts ranking.
pub const RECENCY_BASE_SCORE: f64 = 1.0;

// =============================================================================
// SCORE FUSION CONSTANTS
// Default starting weights for the four ranking signals. Normalized to sum
// to 1.0 before fusion.
// =============================================================================

/// Default weight for graph centrality (PageRank) in score fusion
pub const DEFAULT_PAGERANK_WEIGHT: f64 = 0.3;

/// Default weight for semantic similarity in score fusion
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.4;

/// Default weight for recency in score fusion
pub const DEFAULT_TIME_WEIGHT: f64 = 0.2;

/// Default weight for degree centrality in score fusion
pub const DEFAULT_DEGREE_WEIGHT: f64 = 0.1;

/// Tolerance for the normalized-weight sum invariant
///
/// After normalization the four weights must sum to 1.0 within this bound,
/// unless all four were supplied as zero, in which case normalization is
/// skipped and every fused score is 0.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-9;

// =============================================================================
// RETENTION LAYER THRESHOLDS
// Percentile boundaries partitioning the ranked sequence into tiers.
// Evaluated in order; half-open on the lower side, so an entity at exactly
// 0.70 falls into the semantic-cluster tier.
// =============================================================================

/// Entities below this rank percentile stay in the immediate tier (top 10%)
pub const LAYER_IMMEDIATE_PERCENTILE: f64 = 0.10;

/// Upper percentile bound for the short-term tier (top 30%)
pub const LAYER_SHORT_TERM_PERCENTILE: f64 = 0.30;

/// Upper percentile bound for the long-term tier (top 70%)
pub const LAYER_LONG_TERM_PERCENTILE: f64 = 0.70;

// =============================================================================
// CANDIDATE RETRIEVAL CONSTANTS
// =============================================================================

/// Candidate over-retrieval factor for lexical pre-filtering
///
/// The candidate builders fetch up to `top_k × CANDIDATE_OVERFETCH_FACTOR`
/// entities before ranking.
///
/// Justification:
/// - Ranking re-orders candidates, so the lexical pre-filter must retrieve
///   more than the caller ultimately keeps for recall to stay acceptable
/// - 3× bounds PageRank's input size up front instead of relying on
///   mid-computation cancellation, which the engine deliberately omits
pub const CANDIDATE_OVERFETCH_FACTOR: usize = 3;
