//! # photofind
//!
//! Application layer for photofind: configuration loading and photo tree
//! ingestion, shared between the CLI binary and integration tests.

pub mod config;
pub mod ingest;

pub use config::Config;
pub use ingest::{ingest_tree, IngestSummary, SUPPORTED_EXTS};
