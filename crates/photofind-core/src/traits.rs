//! Collaborator traits for photofind components.
//!
//! This module defines the interfaces the query pipeline consumes:
//!
//! - [`Catalog`]: the persisted photo metadata store
//! - [`VectorIndex`]: approximate-nearest-neighbor search over embeddings
//! - [`Embedder`]: text-to-vector embedding
//!
//! The query engine never owns these collaborators' data; it reads through
//! these traits and treats every failure as a signal to degrade to a weaker
//! retrieval strategy.

use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{CatalogError, EmbedError, IndexError};
use crate::types::{CatalogFilter, CatalogStats, FaceFilter, FaceRecord, PhotoRecord};

// ============================================================================
// Catalog
// ============================================================================

/// The persisted photo metadata store.
///
/// Implementations must return photos in a stable catalog order (insertion
/// order for the in-memory store, rowid order for a SQL store) so that
/// unranked results are deterministic.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch photos matching the filter, in catalog order.
    ///
    /// An empty filter returns the full catalog.
    async fn photos(&self, filter: &CatalogFilter) -> Result<Vec<PhotoRecord>, CatalogError>;

    /// Distinct ids of photos with at least one face matching the filter.
    async fn face_photo_ids(&self, filter: &FaceFilter) -> Result<HashSet<Uuid>, CatalogError>;

    /// Look up a photo by its vector-index reference id.
    async fn photo_by_vector_id(&self, id: &str) -> Result<Option<PhotoRecord>, CatalogError>;

    /// Insert or update a photo record, keyed by path (last write wins).
    async fn upsert_photo(&self, record: &PhotoRecord) -> Result<(), CatalogError>;

    /// Insert a face record for an existing photo.
    async fn upsert_face(&self, record: &FaceRecord) -> Result<(), CatalogError>;

    /// Catalog statistics.
    async fn stats(&self) -> Result<CatalogStats, CatalogError>;
}

// ============================================================================
// Vector Index
// ============================================================================

/// Approximate-nearest-neighbor store mapping embeddings to entry ids.
///
/// Each entry carries a free-text document (the caption, possibly empty)
/// alongside its embedding.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace an entry.
    async fn upsert(
        &self,
        id: &str,
        embedding: Vec<f32>,
        document: &str,
    ) -> Result<(), IndexError>;

    /// The `k` nearest entry ids by the index's similarity metric,
    /// best first.
    async fn query_nearest(&self, embedding: &[f32], k: usize) -> Result<Vec<String>, IndexError>;

    /// Number of stored entries.
    async fn len(&self) -> Result<u64, IndexError>;

    /// Whether the index holds no entries.
    async fn is_empty(&self) -> Result<bool, IndexError> {
        Ok(self.len().await? == 0)
    }
}

// ============================================================================
// Embedder
// ============================================================================

/// Text-to-vector embedding collaborator.
///
/// Query text must be embedded into the same vector space as the indexed
/// photos for nearest-neighbor search to be meaningful.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a piece of text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}
