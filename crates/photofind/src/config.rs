//! Configuration handling for photofind.
//!
//! Settings come from a TOML file with per-field serde defaults, then two
//! environment overrides on top: `INDEX_MODE` (full/fast) and
//! `PHOTOFIND_DATA_DIR`.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use photofind_core::IndexMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory for catalog and vector snapshots; XDG data dir when unset
    pub data_dir: Option<PathBuf>,

    /// Index mode (full/fast)
    #[serde(default)]
    pub mode: IndexMode,

    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Embedding backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderBackend {
    /// Deterministic token-hash vectors
    #[default]
    Hash,
    /// Zero vectors (ranking disabled)
    Noop,
}

/// Embedding-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: EmbedderBackend,

    /// Embedding dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_dimension() -> usize {
    512
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbedderBackend::default(),
            dimension: default_dimension(),
        }
    }
}

/// Query-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Default result limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_limit() -> usize {
    100
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// config file is used if present, else built-in defaults. Environment
    /// overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)
                    .with_context(|| format!("loading config from {}", path.display()))?,
                _ => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply `INDEX_MODE` and `PHOTOFIND_DATA_DIR` overrides.
    fn apply_env(&mut self) {
        if let Ok(mode) = std::env::var("INDEX_MODE") {
            self.mode = IndexMode::from_str_lossy(&mode);
        }
        if let Ok(dir) = std::env::var("PHOTOFIND_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// The directory catalog and vector snapshots live in.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        ProjectDirs::from("", "", "photofind")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("no home directory; set data_dir or PHOTOFIND_DATA_DIR")
    }

    /// Path of the catalog snapshot file.
    pub fn catalog_path(&self) -> Result<PathBuf> {
        Ok(self.resolve_data_dir()?.join("catalog.json"))
    }

    /// Path of the vector index snapshot file.
    pub fn vectors_path(&self) -> Result<PathBuf> {
        Ok(self.resolve_data_dir()?.join("vectors.json"))
    }
}

/// Default config file location (XDG config dir).
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "photofind")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mode, IndexMode::Full);
        assert_eq!(config.query.default_limit, 100);
        assert_eq!(config.embedding.backend, EmbedderBackend::Hash);
        assert_eq!(config.embedding.dimension, 512);
        assert_eq!(config.logging.level, "info");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            mode = "fast"

            [query]
            default_limit = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, IndexMode::Fast);
        assert_eq!(config.query.default_limit, 25);
        assert_eq!(config.embedding.dimension, 512);
    }

    #[test]
    fn test_embedding_backend_parses() {
        let config: Config = toml::from_str(
            r#"
            [embedding]
            backend = "noop"
            dimension = 64
            "#,
        )
        .unwrap();
        assert_eq!(config.embedding.backend, EmbedderBackend::Noop);
        assert_eq!(config.embedding.dimension, 64);
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config::default();
        let raw = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.mode, config.mode);
        assert_eq!(parsed.query.default_limit, config.query.default_limit);
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/pf-data")),
            ..Default::default()
        };
        assert_eq!(
            config.catalog_path().unwrap(),
            PathBuf::from("/tmp/pf-data/catalog.json")
        );
        assert_eq!(
            config.vectors_path().unwrap(),
            PathBuf::from("/tmp/pf-data/vectors.json")
        );
    }

    #[test]
    fn test_load_missing_explicit_file_is_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/config.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mode = \"fast\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.mode, IndexMode::Fast);
    }
}
