//! # photofind-embed
//!
//! Embedding implementations for photofind.
//!
//! | Embedder | Use |
//! |----------|-----|
//! | [`HashEmbedder`] | Deterministic BLAKE3 token-hash vectors, the default |
//! | [`NoopEmbedder`] | Zero vectors, for deployments with ranking disabled |
//!
//! Both implement the `Embedder` trait from `photofind-core`.

pub mod hash;
pub mod noop;

pub use hash::HashEmbedder;
pub use noop::{NoopEmbedder, DEFAULT_DIMENSION};
