//! Core types for photofind.
//!
//! This module contains the shared data structures used across photofind:
//!
//! ## Catalog
//! - [`PhotoRecord`]: Metadata about a cataloged photo
//! - [`FaceRecord`]: A detected face associated with a photo
//! - [`BoundingBox`]: Pixel bounds of a detected face
//!
//! ## Query
//! - [`QueryIntent`]: Structured result of parsing a free-text query
//! - [`CatalogFilter`]: Declarative filter over the catalog
//! - [`FaceFilter`]: Sub-filter over face records
//!
//! ## Mode
//! - [`IndexMode`]: Process-wide capability switch (`Full` vs `Fast`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use uuid::Uuid;

// ============================================================================
// Index Mode
// ============================================================================

/// Process-wide capability switch, fixed at startup.
///
/// `Full` means the semantic collaborators (embeddings, face identity, the
/// color heuristic) are available. `Fast` means only timestamp-derived
/// filters and path/caption/tag lexical matching exist; components built for
/// `Fast` mode must not attempt to call the semantic collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    #[default]
    Full,
    Fast,
}

impl IndexMode {
    /// Parse a mode string, case-insensitively.
    ///
    /// Unrecognized values fall back to `Full`, matching the behavior of the
    /// `INDEX_MODE` environment variable.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "FAST" => Self::Fast,
            _ => Self::Full,
        }
    }

    /// Whether semantic capabilities (embeddings, faces) are available.
    #[must_use]
    pub fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }
}

// ============================================================================
// Catalog Records
// ============================================================================

/// Metadata about a cataloged photo.
///
/// Created once during ingestion; the query pipeline treats records as
/// read-only. `path` is the unique key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Unique photo identifier
    pub id: Uuid,
    /// Absolute path to the photo file (unique key)
    pub path: PathBuf,
    /// Capture timestamp (EXIF or file mtime), if known
    pub ts: Option<DateTime<Utc>>,
    /// Pixel width
    pub width: Option<u32>,
    /// Pixel height
    pub height: Option<u32>,
    /// Generated caption, if any
    pub caption: Option<String>,
    /// Vector-index reference id, if an embedding was stored
    pub vector_id: Option<String>,
    /// JSON-encoded list of tag strings; may be absent or malformed
    pub tags: Option<String>,
}

impl PhotoRecord {
    /// Decode the stored tag list.
    ///
    /// Returns `None` when no tags are stored or the JSON is malformed;
    /// malformed tags are never an error, the entry simply has no tags.
    #[must_use]
    pub fn tag_list(&self) -> Option<Vec<String>> {
        self.tags
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// A detected face associated with a photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRecord {
    /// Unique face identifier
    pub id: Uuid,
    /// Owning photo
    pub photo_id: Uuid,
    /// Person label assigned by recognition, if any
    pub person_name: Option<String>,
    /// Face bounds in the source image
    pub bbox: Option<BoundingBox>,
    /// Torso-region red-coverage heuristic, 0..1
    pub red_ratio: Option<f32>,
}

/// Pixel bounds of a detected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

// ============================================================================
// Query Intent
// ============================================================================

/// Structured result of parsing a free-text query.
///
/// Ephemeral: created per query, discarded after results are produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryIntent {
    /// First 4-digit 19xx/20xx literal found in the query
    pub year: Option<i32>,
    /// Calendar month 1-12, from a full month-name match
    pub month: Option<u32>,
    /// Candidate proper-noun token
    pub person: Option<String>,
    /// True when the query expresses a red-clothing condition
    pub red_shirt: bool,
    /// Ordered, deduplicated lowercase keyword tokens
    pub keywords: Vec<String>,
}

// ============================================================================
// Filters
// ============================================================================

/// Declarative filter over the catalog.
///
/// Built by the filter builder and executed by a [`Catalog`] implementation.
/// Predicates compose with AND; `text_any` is an OR-combined case-insensitive
/// substring match over path, caption, and raw tag text.
///
/// [`Catalog`]: crate::traits::Catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Calendar year of the timestamp must equal this
    pub year: Option<i32>,
    /// Calendar month of the timestamp must equal this
    pub month: Option<u32>,
    /// Restrict to this photo-id set (face sub-filter result)
    pub ids: Option<HashSet<Uuid>>,
    /// Keep entries where any keyword is a substring of path, caption, or tags
    pub text_any: Vec<String>,
}

/// Sub-filter over face records.
///
/// Produces the distinct set of photo ids with at least one qualifying face.
#[derive(Debug, Clone, Default)]
pub struct FaceFilter {
    /// Exact person-label match
    pub person: Option<String>,
    /// Keep faces with a red-coverage score at or above this
    pub min_red_ratio: Option<f32>,
}

// ============================================================================
// Statistics
// ============================================================================

/// Catalog statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Total cataloged photos
    pub total_photos: u64,
    /// Total face records
    pub total_faces: u64,
    /// Photos with a vector-index reference
    pub indexed_photos: u64,
    /// Last catalog update
    pub last_updated: Option<DateTime<Utc>>,
}
