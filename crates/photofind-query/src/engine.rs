//! Hybrid search engine.
//!
//! Executes a parsed query against the catalog and, when available, the
//! semantic backend:
//!
//! 1. Resolve the face sub-filter into a photo-id set.
//! 2. Fetch structurally filtered candidates from the catalog.
//! 3. Rank candidates by vector similarity with a tag bonus, or fall back
//!    to lexical keyword matching when no semantic backend exists or any
//!    semantic step fails.
//!
//! The public search surface is infallible: collaborator failures are
//! logged and degrade the result (weaker ranking, or an empty list) rather
//! than surfacing as errors.

use photofind_core::{
    Catalog, CatalogFilter, Embedder, IndexMode, PhotoRecord, QueryIntent, Result, VectorIndex,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::filter::FilterBuilder;
use crate::parser::IntentParser;

/// Default maximum number of results per query.
pub const DEFAULT_LIMIT: usize = 100;

/// The semantic collaborators, present only in `Full` mode.
#[derive(Clone)]
pub struct SemanticBackend {
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
}

/// Query execution engine.
///
/// Construct with [`SearchEngine::full`] when embeddings and face data are
/// available, or [`SearchEngine::fast`] for a catalog-only deployment. The
/// constructor fixes the capability set; there is no runtime mode switch.
#[derive(Clone)]
pub struct SearchEngine {
    catalog: Arc<dyn Catalog>,
    semantic: Option<SemanticBackend>,
    parser: IntentParser,
    filters: FilterBuilder,
    default_limit: usize,
}

impl SearchEngine {
    /// Engine with the full capability set: structured filters, face
    /// restrictions, and semantic ranking.
    #[must_use]
    pub fn full(
        catalog: Arc<dyn Catalog>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            catalog,
            semantic: Some(SemanticBackend { embedder, index }),
            parser: IntentParser::new(IndexMode::Full),
            filters: FilterBuilder::new(IndexMode::Full),
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Catalog-only engine: timestamp filters and lexical keyword matching.
    #[must_use]
    pub fn fast(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            semantic: None,
            parser: IntentParser::new(IndexMode::Fast),
            filters: FilterBuilder::new(IndexMode::Fast),
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Override the default result limit.
    #[must_use]
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// The parser this engine uses, for callers that want the intent.
    #[must_use]
    pub fn parser(&self) -> &IntentParser {
        &self.parser
    }

    /// Search with the default result limit.
    pub async fn search(&self, query: &str) -> Vec<PhotoRecord> {
        self.search_with_limit(query, self.default_limit).await
    }

    /// Search with an explicit result limit.
    pub async fn search_with_limit(&self, query: &str, limit: usize) -> Vec<PhotoRecord> {
        let intent = self.parser.parse(query);
        debug!(?intent, "parsed query");
        self.search_intent(&intent, limit).await
    }

    /// Execute an already-parsed intent.
    pub async fn search_intent(&self, intent: &QueryIntent, limit: usize) -> Vec<PhotoRecord> {
        let mut structured = self.filters.build(intent);

        if let Some(face_filter) = structured.faces.take() {
            match self.catalog.face_photo_ids(&face_filter).await {
                Ok(ids) => structured.catalog.ids = Some(ids),
                // Degrade: drop the face restriction, keep the rest.
                Err(err) => warn!(error = %err, "face lookup failed, skipping face restriction"),
            }
        }

        let unconstrained = structured.catalog.year.is_none()
            && structured.catalog.month.is_none()
            && structured.catalog.ids.is_none();

        let entries = match self.catalog.photos(&structured.catalog).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "catalog query failed");
                return Vec::new();
            }
        };

        if intent.keywords.is_empty() {
            let mut entries = entries;
            entries.truncate(limit);
            return entries;
        }

        if let Some(backend) = &self.semantic {
            match self
                .rank_semantic(backend, intent, &entries, unconstrained, limit)
                .await
            {
                Ok(ranked) => return ranked,
                Err(err) => {
                    warn!(error = %err, "semantic ranking failed, falling back to lexical")
                }
            }
        }

        self.lexical(&structured.catalog, &intent.keywords, limit)
            .await
    }

    /// Vector-similarity ranking over the structurally filtered candidates.
    ///
    /// Candidates are intersected with the nearest-neighbor hits and scored
    /// 1.0, plus a 0.5 bonus when any stored tag matches a query keyword.
    /// The sort is stable, so equal scores keep the similarity order.
    async fn rank_semantic(
        &self,
        backend: &SemanticBackend,
        intent: &QueryIntent,
        entries: &[PhotoRecord],
        unconstrained: bool,
        limit: usize,
    ) -> Result<Vec<PhotoRecord>> {
        let query_text = intent.keywords.join(" ");
        let embedding = backend.embedder.embed_text(&query_text).await?;
        let hits = backend.index.query_nearest(&embedding, limit).await?;

        if entries.is_empty() {
            // With structural predicates in play an empty candidate set is
            // the answer. Without any, resolve the hits directly.
            if !unconstrained {
                return Ok(Vec::new());
            }
            let mut resolved = Vec::new();
            for id in &hits {
                if let Some(record) = self.catalog.photo_by_vector_id(id).await? {
                    resolved.push(record);
                }
            }
            resolved.truncate(limit);
            return Ok(resolved);
        }

        let by_vector_id: HashMap<&str, &PhotoRecord> = entries
            .iter()
            .filter_map(|r| r.vector_id.as_deref().map(|v| (v, r)))
            .collect();

        let mut scored: Vec<(f32, PhotoRecord)> = Vec::new();
        for id in &hits {
            if let Some(record) = by_vector_id.get(id.as_str()) {
                let mut score = 1.0_f32;
                if let Some(tags) = record.tag_list() {
                    if tags
                        .iter()
                        .any(|t| intent.keywords.contains(&t.to_lowercase()))
                    {
                        score += 0.5;
                    }
                }
                scored.push((score, (*record).clone()));
            }
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let mut ranked: Vec<PhotoRecord> = scored.into_iter().map(|(_, r)| r).collect();
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Lexical retrieval: the structural filter plus an OR of the keywords
    /// over path, caption, and tag text, in catalog order.
    async fn lexical(
        &self,
        base: &CatalogFilter,
        keywords: &[String],
        limit: usize,
    ) -> Vec<PhotoRecord> {
        let mut filter = base.clone();
        filter.text_any = keywords.to_vec();
        match self.catalog.photos(&filter).await {
            Ok(mut entries) => {
                entries.truncate(limit);
                entries
            }
            Err(err) => {
                warn!(error = %err, "lexical retrieval failed");
                Vec::new()
            }
        }
    }
}
