//! In-memory vector index.
//!
//! Brute-force cosine-similarity nearest-neighbor search over a flat entry
//! list, fixed to a single embedding dimension. Entries keep insertion
//! order, and the similarity sort is stable, so equal scores resolve
//! deterministically. Persists to a JSON snapshot file like the catalog.

use async_trait::async_trait;
use photofind_core::{IndexError, Result, VectorIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone, Serialize, Deserialize)]
struct VectorEntry {
    id: String,
    embedding: Vec<f32>,
    document: String,
}

#[derive(Default)]
struct IndexInner {
    entries: Vec<VectorEntry>,
    by_id: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct IndexSnapshot {
    dimension: usize,
    entries: Vec<VectorEntry>,
}

/// In-memory [`VectorIndex`] with brute-force cosine search.
pub struct MemoryVectorIndex {
    dimension: usize,
    inner: RwLock<IndexInner>,
}

impl MemoryVectorIndex {
    /// Create an empty index for embeddings of the given dimension.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: RwLock::new(IndexInner::default()),
        }
    }

    /// The embedding dimension this index accepts.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Load an index from a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot: IndexSnapshot = serde_json::from_str(&raw)?;
        debug!(
            entries = snapshot.entries.len(),
            dimension = snapshot.dimension,
            path = %path.display(),
            "loaded vector index snapshot"
        );

        let by_id = snapshot
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();

        Ok(Self {
            dimension: snapshot.dimension,
            inner: RwLock::new(IndexInner {
                entries: snapshot.entries,
                by_id,
            }),
        })
    }

    /// Write the index to a JSON snapshot file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let inner = self.inner.read().await;
        let snapshot = IndexSnapshot {
            dimension: self.dimension,
            entries: inner.entries.clone(),
        };
        drop(inner);

        let raw = serde_json::to_string(&snapshot)?;
        std::fs::write(path, raw)?;
        debug!(path = %path.display(), "saved vector index snapshot");
        Ok(())
    }
}

/// Cosine similarity; zero-norm vectors score 0.0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn upsert(
        &self,
        id: &str,
        embedding: Vec<f32>,
        document: &str,
    ) -> std::result::Result<(), IndexError> {
        if embedding.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                got: embedding.len(),
                expected: self.dimension,
            });
        }

        let entry = VectorEntry {
            id: id.to_string(),
            embedding,
            document: document.to_string(),
        };

        let mut inner = self.inner.write().await;
        if let Some(&idx) = inner.by_id.get(id) {
            inner.entries[idx] = entry;
        } else {
            let idx = inner.entries.len();
            inner.by_id.insert(id.to_string(), idx);
            inner.entries.push(entry);
        }
        Ok(())
    }

    async fn query_nearest(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> std::result::Result<Vec<String>, IndexError> {
        if embedding.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                got: embedding.len(),
                expected: self.dimension,
            });
        }

        let inner = self.inner.read().await;
        let mut scored: Vec<(f32, &VectorEntry)> = inner
            .entries
            .iter()
            .map(|e| (cosine_similarity(embedding, &e.embedding), e))
            .collect();
        // Stable: equal similarities keep insertion order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, e)| e.id.clone())
            .collect())
    }

    async fn len(&self) -> std::result::Result<u64, IndexError> {
        Ok(self.inner.read().await.entries.len() as u64)
    }
}
