//! Structured error types for the ranking engine
//!
//! The engine's overall policy is fail-open: ranking proceeds with degraded
//! signals wherever possible. These types exist so that each degradation or
//! rejection remains a distinct, diagnosable outcome instead of a blanket
//! catch-and-suppress.

use std::fmt;

/// Engine error types with proper categorization
#[derive(Debug)]
pub enum EngineError {
    // Rejected at the API boundary before scoring runs (the combiner itself
    // assumes non-negative weights)
    InvalidWeight { signal: &'static str, value: f64 },

    // Vector index: fatal to the feature, never fatal to the process
    IndexUnavailable(String),
    IndexCorrupted { vectors: usize, ids: usize },
    DimensionMismatch { expected: usize, got: usize },

    // Embedding provider call failed (provider present but encode errored)
    EmbeddingFailed(String),

    // Persistence
    StorageError(String),
    SerializationError(String),

    // Generic wrapper for external errors
    Internal(anyhow::Error),
}

impl EngineError {
    /// Get error code for machine identification
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidWeight { .. } => "INVALID_WEIGHT",
            Self::IndexUnavailable(_) => "INDEX_UNAVAILABLE",
            Self::IndexCorrupted { .. } => "INDEX_CORRUPTED",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::EmbeddingFailed(_) => "EMBEDDING_FAILED",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get detailed error message
    pub fn message(&self) -> String {
        match self {
            Self::InvalidWeight { signal, value } => {
                format!("Invalid weight for signal '{signal}': {value} (weights must be non-negative)")
            }
            Self::IndexUnavailable(msg) => format!("Vector index unavailable: {msg}"),
            Self::IndexCorrupted { vectors, ids } => format!(
                "Vector index corrupted: {vectors} stored vectors but {ids} persisted ids"
            ),
            Self::DimensionMismatch { expected, got } => {
                format!("Vector dimension mismatch: expected {expected}, got {got}")
            }
            Self::EmbeddingFailed(msg) => format!("Embedding generation failed: {msg}"),
            Self::StorageError(msg) => format!("Storage error: {msg}"),
            Self::SerializationError(msg) => format!("Serialization error: {msg}"),
            Self::Internal(err) => format!("Internal error: {err}"),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EngineError {}

/// Convert from anyhow::Error to EngineError
impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Type alias for Results using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
