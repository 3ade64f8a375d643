//! Photo tree ingestion.
//!
//! Walks a directory tree, catalogs every supported image file, and, when
//! the semantic collaborators are present, indexes an embedding of the
//! file's path tokens. Timestamps come from file mtime and the path tokens
//! double as the photo's tags, so a freshly ingested tree is immediately
//! searchable by year, month, and path keywords.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use photofind_core::{Catalog, CatalogFilter, Embedder, PhotoRecord, VectorIndex};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

/// File extensions treated as photos, lowercase.
pub const SUPPORTED_EXTS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff", "heic", "heif",
];

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Files cataloged
    pub cataloged: u64,
    /// Files also added to the vector index
    pub indexed: u64,
    /// Files skipped (unsupported extension, unreadable, or already cataloged)
    pub skipped: u64,
}

/// Distinct alphanumeric runs of length >= 2 from the path, lowercased
/// and sorted.
pub fn path_tokens(path: &Path) -> Vec<String> {
    let raw = path.to_string_lossy().to_lowercase();
    let mut tokens: Vec<String> = raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(str::to_string)
        .collect();
    tokens.sort();
    tokens.dedup();
    tokens
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTS.contains(&e.to_lowercase().as_str()))
}

/// Ingest every supported image under `root`.
///
/// Already-cataloged paths are left untouched, so re-running over the same
/// tree is a no-op and never reassigns photo ids out from under existing
/// face records. Per-file failures are logged and counted as skips; only
/// walking the root itself can fail the run.
pub async fn ingest_tree(
    root: &Path,
    catalog: &dyn Catalog,
    semantic: Option<(&dyn Embedder, &dyn VectorIndex)>,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();

    let existing: HashSet<PathBuf> = catalog
        .photos(&CatalogFilter::default())
        .await
        .context("reading existing catalog entries")?
        .into_iter()
        .map(|p| p.path)
        .collect();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "unreadable directory entry");
                summary.skipped += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_supported(path) {
            summary.skipped += 1;
            continue;
        }
        if existing.contains(path) {
            debug!(path = %path.display(), "already cataloged");
            summary.skipped += 1;
            continue;
        }

        let ts: Option<DateTime<Utc>> = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        let tokens = path_tokens(path);
        let vector_id = semantic
            .is_some()
            .then(|| path.to_string_lossy().into_owned());

        let record = PhotoRecord {
            id: Uuid::new_v4(),
            path: path.to_path_buf(),
            ts,
            width: None,
            height: None,
            caption: None,
            vector_id: vector_id.clone(),
            tags: Some(serde_json::to_string(&tokens)?),
        };

        if let Err(err) = catalog.upsert_photo(&record).await {
            warn!(path = %path.display(), error = %err, "catalog insert failed");
            summary.skipped += 1;
            continue;
        }
        summary.cataloged += 1;
        debug!(path = %path.display(), "cataloged");

        if let (Some((embedder, index)), Some(vector_id)) = (semantic, vector_id) {
            let document = tokens.join(" ");
            match embedder.embed_text(&document).await {
                Ok(embedding) => match index.upsert(&vector_id, embedding, &document).await {
                    Ok(()) => summary.indexed += 1,
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "vector insert failed")
                    }
                },
                Err(err) => warn!(path = %path.display(), error = %err, "embedding failed"),
            }
        }
    }

    info!(
        cataloged = summary.cataloged,
        indexed = summary.indexed,
        skipped = summary.skipped,
        root = %root.display(),
        "ingest finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use photofind_embed::HashEmbedder;
    use photofind_store::{MemoryCatalog, MemoryVectorIndex};

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"test").unwrap();
    }

    #[test]
    fn test_path_tokens() {
        let tokens = path_tokens(Path::new("/Photos/2022/Cancun-Trip/IMG_0042.jpg"));
        assert_eq!(
            tokens,
            vec!["0042", "2022", "cancun", "img", "jpg", "photos", "trip"]
        );
    }

    #[test]
    fn test_path_tokens_drop_short_runs() {
        let tokens = path_tokens(Path::new("/p/a/beach.png"));
        assert_eq!(tokens, vec!["beach", "png"]);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("/p/a.jpg")));
        assert!(is_supported(Path::new("/p/a.JPEG")));
        assert!(is_supported(Path::new("/p/a.heic")));
        assert!(!is_supported(Path::new("/p/a.txt")));
        assert!(!is_supported(Path::new("/p/noext")));
    }

    #[tokio::test]
    async fn test_ingest_catalogs_and_indexes() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("2022/cancun/beach.jpg"));
        touch(&dir.path().join("2023/paris/tower.png"));
        touch(&dir.path().join("notes.txt"));

        let catalog = MemoryCatalog::new();
        let embedder = HashEmbedder::new(64);
        let index = MemoryVectorIndex::new(64);

        let summary = ingest_tree(dir.path(), &catalog, Some((&embedder, &index)))
            .await
            .unwrap();
        assert_eq!(summary.cataloged, 2);
        assert_eq!(summary.indexed, 2);
        assert_eq!(summary.skipped, 1);

        let photos = catalog.photos(&CatalogFilter::default()).await.unwrap();
        assert_eq!(photos.len(), 2);
        for photo in &photos {
            assert!(photo.ts.is_some());
            assert!(photo.vector_id.is_some());
            let tags = photo.tag_list().expect("tags decode");
            assert!(!tags.is_empty());
        }
        assert_eq!(index.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ingest_without_semantic_backend() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("beach.jpg"));

        let catalog = MemoryCatalog::new();
        let summary = ingest_tree(dir.path(), &catalog, None).await.unwrap();
        assert_eq!(summary.cataloged, 1);
        assert_eq!(summary.indexed, 0);

        let photos = catalog.photos(&CatalogFilter::default()).await.unwrap();
        assert!(photos[0].vector_id.is_none());
    }

    #[tokio::test]
    async fn test_reingest_does_not_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("beach.jpg"));

        let catalog = MemoryCatalog::new();
        let first = ingest_tree(dir.path(), &catalog, None).await.unwrap();
        assert_eq!(first.cataloged, 1);

        let second = ingest_tree(dir.path(), &catalog, None).await.unwrap();
        assert_eq!(second.cataloged, 0);
        assert_eq!(second.skipped, 1);

        let photos = catalog.photos(&CatalogFilter::default()).await.unwrap();
        assert_eq!(photos.len(), 1);
    }

    #[tokio::test]
    async fn test_ingested_tree_is_searchable_by_tokens() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("2022/cancun/beach.jpg"));
        touch(&dir.path().join("2023/paris/tower.jpg"));

        let catalog = MemoryCatalog::new();
        ingest_tree(dir.path(), &catalog, None).await.unwrap();

        let filter = CatalogFilter {
            text_any: vec!["cancun".to_string()],
            ..Default::default()
        };
        let hits = catalog.photos(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].path.to_string_lossy().contains("cancun"));
    }
}
