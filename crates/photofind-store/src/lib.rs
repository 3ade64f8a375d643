//! # photofind-store
//!
//! Storage backends for photofind: an in-memory photo catalog and an
//! in-memory vector index, both with JSON snapshot persistence.
//!
//! | Type | Implements | Persistence |
//! |------|-----------|-------------|
//! | [`MemoryCatalog`] | `Catalog` | `catalog.json` snapshot |
//! | [`MemoryVectorIndex`] | `VectorIndex` | `vectors.json` snapshot |
//!
//! Both backends are `RwLock`-guarded and safe to share behind an `Arc`.
//! Catalog order is insertion order; upserts key photos by path and replace
//! in place.

pub mod catalog;
pub mod vector;

pub use catalog::MemoryCatalog;
pub use vector::MemoryVectorIndex;
