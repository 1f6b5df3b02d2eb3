//! Embedding provider boundary
//!
//! The engine consumes embeddings from an external collaborator; no model
//! runtime ships with this crate. Implement [`Embedder`] for whatever backend
//! produces vectors, then resolve it once at construction into an
//! [`EmbeddingProvider`]: the capability is either present with its
//! interface or absent, and callers branch on presence rather than checking a
//! mutable flag ad hoc.

use std::sync::Arc;

use anyhow::Result;

/// Trait for embedding generation
pub trait Embedder: Send + Sync {
    /// Generate embedding for text
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Get embedding dimension
    fn dimension(&self) -> usize;

    /// Batch encode multiple texts (default: sequential)
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

/// Embedding capability resolved at construction
///
/// Wraps an optional backend. When absent, every `embed` call returns `None`
/// and semantic scoring contributes nothing, the fail-open path for a
/// disabled provider. When present, a failed `encode` is logged as its own
/// outcome and degrades to `None` for that text only.
#[derive(Clone)]
pub struct EmbeddingProvider {
    backend: Option<Arc<dyn Embedder>>,
}

impl EmbeddingProvider {
    /// Resolve the capability from an optional backend
    pub fn resolve(backend: Option<Arc<dyn Embedder>>) -> Self {
        match &backend {
            Some(b) => tracing::info!(dimension = b.dimension(), "Embedding provider enabled"),
            None => tracing::info!("Embedding provider absent, semantic scoring disabled"),
        }
        Self { backend }
    }

    /// A provider with no backend; embeds nothing
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Whether a backend is present
    pub fn enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Embedding dimension of the backend, if present
    pub fn dimension(&self) -> Option<usize> {
        self.backend.as_ref().map(|b| b.dimension())
    }

    /// Embed one text, degrading to `None` on absence or failure
    pub fn embed(&self, text: &str) -> Option<Vec<f32>> {
        let backend = self.backend.as_ref()?;
        if text.is_empty() {
            return None;
        }
        match backend.encode(text) {
            Ok(vector) => Some(vector),
            Err(err) => {
                tracing::warn!(%err, "Embedding call failed, degrading to no vector");
                None
            }
        }
    }

    /// Embed many texts, position-aligned with the input
    ///
    /// Empty texts and failed encodes yield `None` in place, mirroring
    /// [`EmbeddingProvider::embed`].
    pub fn embed_batch(&self, texts: &[&str]) -> Vec<Option<Vec<f32>>> {
        if self.backend.is_none() {
            return vec![None; texts.len()];
        }
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnitEmbedder;

    impl Embedder for UnitEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            if text == "boom" {
                anyhow::bail!("encoder exploded");
            }
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[test]
    fn test_absent_provider_embeds_nothing() {
        let provider = EmbeddingProvider::disabled();
        assert!(!provider.enabled());
        assert!(provider.embed("hello").is_none());
        assert_eq!(provider.embed_batch(&["a", "b"]), vec![None, None]);
    }

    #[test]
    fn test_present_provider_embeds() {
        let provider = EmbeddingProvider::resolve(Some(Arc::new(UnitEmbedder)));
        assert!(provider.enabled());
        assert_eq!(provider.dimension(), Some(2));
        assert_eq!(provider.embed("hello"), Some(vec![5.0, 1.0]));
    }

    #[test]
    fn test_failures_degrade_per_text() {
        let provider = EmbeddingProvider::resolve(Some(Arc::new(UnitEmbedder)));
        let batch = provider.embed_batch(&["ok", "boom", ""]);
        assert!(batch[0].is_some());
        assert!(batch[1].is_none());
        assert!(batch[2].is_none());
    }
}
