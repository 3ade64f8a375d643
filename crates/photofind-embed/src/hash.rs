//! Hash-based deterministic embedder.
//!
//! Embeds text by hashing each whitespace token with BLAKE3, expanding the
//! hash into a pseudo-random dense vector, summing the token vectors, and
//! L2-normalizing the result. No model weights, no network, fully
//! deterministic across runs and platforms.
//!
//! Texts sharing tokens share vector components, so cosine similarity
//! roughly tracks token overlap. That is enough for ranking photos whose
//! indexed documents are path tokens and captions.

use async_trait::async_trait;
use photofind_core::{EmbedError, Embedder};

const MODEL_NAME: &str = "blake3-token-hash";

/// Deterministic [`Embedder`] built on BLAKE3 token hashing.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of the given dimension.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Expand one token into a dense vector with components in [-1, 1].
    fn token_vector(&self, token: &str) -> Vec<f32> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(token.as_bytes());
        let mut reader = hasher.finalize_xof();

        let mut bytes = vec![0u8; self.dimension];
        reader.fill(&mut bytes);
        bytes
            .into_iter()
            .map(|b| f32::from(b) / 127.5 - 1.0)
            .collect()
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut acc = vec![0.0f32; self.dimension];
        for token in text.split_whitespace() {
            let tv = self.token_vector(&token.to_lowercase());
            for (a, t) in acc.iter_mut().zip(tv) {
                *a += t;
            }
        }

        let norm: f32 = acc.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for a in &mut acc {
                *a /= norm;
            }
        }
        Ok(acc)
    }
}
