//! Intent-to-filter translation.
//!
//! Maps a parsed [`QueryIntent`] onto the declarative filters the catalog
//! executes: a [`CatalogFilter`] for the structured predicates and an
//! optional [`FaceFilter`] when face-derived restrictions apply.
//!
//! The face sub-filter only exists in `Full` mode. In `Fast` mode no face
//! data was ever written, so person and color conditions silently fall back
//! to keyword matching.

use photofind_core::{CatalogFilter, FaceFilter, IndexMode, QueryIntent};

/// Minimum torso red-coverage ratio for a face to count as "wearing red".
pub const RED_RATIO_THRESHOLD: f32 = 0.06;

/// The structured half of a query: catalog predicates plus the optional
/// face sub-filter that narrows them to an id set.
#[derive(Debug, Clone, Default)]
pub struct StructuredFilter {
    /// Predicates executed directly against the catalog.
    pub catalog: CatalogFilter,
    /// Face restriction to resolve into a photo-id set first, if any.
    pub faces: Option<FaceFilter>,
}

impl StructuredFilter {
    /// Whether any structural predicate applies (year, month, or a face
    /// restriction). Keyword-only queries return `false`.
    #[must_use]
    pub fn has_structural_predicates(&self) -> bool {
        self.catalog.year.is_some() || self.catalog.month.is_some() || self.faces.is_some()
    }
}

/// Builds catalog and face filters from a parsed intent.
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    mode: IndexMode,
}

impl FilterBuilder {
    /// Create a builder for the given index mode.
    #[must_use]
    pub fn new(mode: IndexMode) -> Self {
        Self { mode }
    }

    /// Translate an intent into structured filters.
    ///
    /// Year and month carry over directly. The face sub-filter is produced
    /// only in `Full` mode and only when the intent has a person or a
    /// red-clothing condition; the color condition becomes a
    /// [`RED_RATIO_THRESHOLD`] floor on the face's red-coverage score.
    #[must_use]
    pub fn build(&self, intent: &QueryIntent) -> StructuredFilter {
        let catalog = CatalogFilter {
            year: intent.year,
            month: intent.month,
            ..Default::default()
        };

        let faces = if self.mode.is_full() && (intent.person.is_some() || intent.red_shirt) {
            Some(FaceFilter {
                person: intent.person.clone(),
                min_red_ratio: intent.red_shirt.then_some(RED_RATIO_THRESHOLD),
            })
        } else {
            None
        };

        StructuredFilter { catalog, faces }
    }
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self::new(IndexMode::Full)
    }
}
