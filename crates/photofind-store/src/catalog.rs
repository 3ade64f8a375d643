//! In-memory photo catalog.
//!
//! Holds photo and face records behind a [`tokio::sync::RwLock`] and serves
//! the [`Catalog`] trait. Records keep insertion order, which is the catalog
//! order filters and unranked results observe. The catalog can be saved to
//! and loaded from a JSON snapshot file for persistence between runs.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use photofind_core::{
    Catalog, CatalogError, CatalogFilter, CatalogStats, FaceFilter, FaceRecord, PhotoRecord,
    Result,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct CatalogInner {
    /// Photos in insertion order. Upserts replace in place so an updated
    /// photo keeps its original catalog position.
    photos: Vec<PhotoRecord>,
    by_path: HashMap<PathBuf, usize>,
    faces: Vec<FaceRecord>,
    last_updated: Option<DateTime<Utc>>,
}

/// Serialized catalog contents.
#[derive(Serialize, Deserialize)]
struct CatalogSnapshot {
    photos: Vec<PhotoRecord>,
    faces: Vec<FaceRecord>,
}

/// In-memory [`Catalog`] implementation with JSON snapshot persistence.
#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<CatalogInner>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&raw)?;
        debug!(
            photos = snapshot.photos.len(),
            faces = snapshot.faces.len(),
            path = %path.display(),
            "loaded catalog snapshot"
        );

        let by_path = snapshot
            .photos
            .iter()
            .enumerate()
            .map(|(i, p)| (p.path.clone(), i))
            .collect();

        Ok(Self {
            inner: RwLock::new(CatalogInner {
                photos: snapshot.photos,
                by_path,
                faces: snapshot.faces,
                last_updated: None,
            }),
        })
    }

    /// Write the catalog to a JSON snapshot file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let inner = self.inner.read().await;
        let snapshot = CatalogSnapshot {
            photos: inner.photos.clone(),
            faces: inner.faces.clone(),
        };
        drop(inner);

        let raw = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, raw)?;
        debug!(path = %path.display(), "saved catalog snapshot");
        Ok(())
    }
}

/// Whether a record passes the filter's predicates (AND-combined), with
/// `text_any` as an OR of case-insensitive substring matches over path,
/// caption, and raw tag text.
fn matches(record: &PhotoRecord, filter: &CatalogFilter) -> bool {
    if let Some(year) = filter.year {
        match record.ts {
            Some(ts) if ts.year() == year => {}
            _ => return false,
        }
    }
    if let Some(month) = filter.month {
        match record.ts {
            Some(ts) if ts.month() == month => {}
            _ => return false,
        }
    }
    if let Some(ids) = &filter.ids {
        if !ids.contains(&record.id) {
            return false;
        }
    }
    if !filter.text_any.is_empty() {
        let path = record.path.to_string_lossy().to_lowercase();
        let caption = record.caption.as_deref().unwrap_or("").to_lowercase();
        let tags = record.tags.as_deref().unwrap_or("").to_lowercase();
        let hit = filter
            .text_any
            .iter()
            .map(|kw| kw.to_lowercase())
            .any(|kw| path.contains(&kw) || caption.contains(&kw) || tags.contains(&kw));
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn photos(&self, filter: &CatalogFilter) -> std::result::Result<Vec<PhotoRecord>, CatalogError> {
        let inner = self.inner.read().await;
        Ok(inner
            .photos
            .iter()
            .filter(|p| matches(p, filter))
            .cloned()
            .collect())
    }

    async fn face_photo_ids(
        &self,
        filter: &FaceFilter,
    ) -> std::result::Result<HashSet<Uuid>, CatalogError> {
        let inner = self.inner.read().await;
        Ok(inner
            .faces
            .iter()
            .filter(|f| {
                if let Some(person) = &filter.person {
                    if f.person_name.as_deref() != Some(person.as_str()) {
                        return false;
                    }
                }
                if let Some(min) = filter.min_red_ratio {
                    match f.red_ratio {
                        Some(ratio) if ratio >= min => {}
                        _ => return false,
                    }
                }
                true
            })
            .map(|f| f.photo_id)
            .collect())
    }

    async fn photo_by_vector_id(
        &self,
        id: &str,
    ) -> std::result::Result<Option<PhotoRecord>, CatalogError> {
        let inner = self.inner.read().await;
        Ok(inner
            .photos
            .iter()
            .find(|p| p.vector_id.as_deref() == Some(id))
            .cloned())
    }

    async fn upsert_photo(&self, record: &PhotoRecord) -> std::result::Result<(), CatalogError> {
        let mut inner = self.inner.write().await;
        if let Some(&idx) = inner.by_path.get(&record.path) {
            inner.photos[idx] = record.clone();
        } else {
            let idx = inner.photos.len();
            inner.by_path.insert(record.path.clone(), idx);
            inner.photos.push(record.clone());
        }
        inner.last_updated = Some(Utc::now());
        Ok(())
    }

    async fn upsert_face(&self, record: &FaceRecord) -> std::result::Result<(), CatalogError> {
        let mut inner = self.inner.write().await;
        if !inner.photos.iter().any(|p| p.id == record.photo_id) {
            return Err(CatalogError::Insert(format!(
                "no photo with id {}",
                record.photo_id
            )));
        }
        inner.faces.push(record.clone());
        inner.last_updated = Some(Utc::now());
        Ok(())
    }

    async fn stats(&self) -> std::result::Result<CatalogStats, CatalogError> {
        let inner = self.inner.read().await;
        Ok(CatalogStats {
            total_photos: inner.photos.len() as u64,
            total_faces: inner.faces.len() as u64,
            indexed_photos: inner.photos.iter().filter(|p| p.vector_id.is_some()).count() as u64,
            last_updated: inner.last_updated,
        })
    }
}
