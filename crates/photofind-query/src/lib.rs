//! # photofind-query
//!
//! Natural-language query parsing and hybrid retrieval for photofind.
//!
//! ## Pipeline
//!
//! ```text
//! "red shirt July 2023"
//!         │
//!         ▼
//!   IntentParser ──► QueryIntent { month: 7, year: 2023, red_shirt, keywords }
//!         │
//!         ▼
//!   FilterBuilder ──► CatalogFilter + optional FaceFilter
//!         │
//!         ▼
//!   SearchEngine ──► ranked Vec<PhotoRecord>
//! ```
//!
//! ## Components
//!
//! | Component | Responsibility |
//! |-----------|---------------|
//! | [`IntentParser`] | Heuristic extraction of year, month, person, color, keywords |
//! | [`FilterBuilder`] | Intent to declarative catalog/face filters |
//! | [`SearchEngine`] | Candidate filtering, semantic ranking, lexical fallback |
//!
//! The search surface is infallible: failures in the embedding or vector
//! collaborators degrade to lexical retrieval, and catalog failures yield
//! an empty result, with a warning logged either way.

pub mod engine;
pub mod filter;
pub mod parser;

pub use engine::{SearchEngine, SemanticBackend, DEFAULT_LIMIT};
pub use filter::{FilterBuilder, StructuredFilter, RED_RATIO_THRESHOLD};
pub use parser::IntentParser;
