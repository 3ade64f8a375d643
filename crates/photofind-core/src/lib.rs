//! # photofind-core
//!
//! Core types and traits for photofind, a personal photo indexing and
//! natural-language search tool.
//!
//! This crate provides the foundational abstractions used throughout
//! photofind:
//!
//! - **Catalog access**: [`Catalog`] trait over the photo metadata store
//! - **Vector search**: [`VectorIndex`] trait for nearest-neighbor lookup
//! - **Embedding**: [`Embedder`] trait for text-to-vector conversion
//!
//! ## Architecture
//!
//! The query pipeline is a sequential, per-query flow:
//!
//! ```text
//! raw query → IntentParser → QueryIntent → FilterBuilder → CatalogFilter
//!                                                              ↓
//!                              SearchEngine → ranked Vec<PhotoRecord>
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PhotoRecord`] | Metadata about a cataloged photo |
//! | [`FaceRecord`] | A detected face with person label and color score |
//! | [`QueryIntent`] | Structured result of parsing a free-text query |
//! | [`CatalogFilter`] | Declarative filter over the catalog |
//! | [`IndexMode`] | Process-wide `Full` vs `Fast` capability switch |
//!
//! ## Related Crates
//!
//! - `photofind-query`: intent parsing, filter building, search engine
//! - `photofind-store`: in-memory catalog and vector index
//! - `photofind-embed`: embedding implementations

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CatalogError, EmbedError, Error, IndexError, Result};
pub use traits::*;
pub use types::*;
