//! No-op embedder.
//!
//! Produces zero vectors. Useful as a stand-in when semantic ranking is
//! disabled but the pipeline still expects an [`Embedder`]: every
//! similarity ties at zero, so ranking degrades to the index's stable
//! ordering rather than failing.

use async_trait::async_trait;
use photofind_core::{EmbedError, Embedder};
use tracing::debug;

/// Default embedding dimension, matching CLIP ViT-B/32 output.
pub const DEFAULT_DIMENSION: usize = 512;

/// [`Embedder`] that returns zero vectors.
#[derive(Debug, Clone)]
pub struct NoopEmbedder {
    dimension: usize,
}

impl NoopEmbedder {
    /// Create a no-op embedder with the default dimension.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dimension(DEFAULT_DIMENSION)
    }

    /// Create a no-op embedder with an explicit dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for NoopEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for NoopEmbedder {
    fn model_name(&self) -> &str {
        "noop"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        debug!(len = text.len(), "noop embed");
        Ok(vec![0.0; self.dimension])
    }
}
