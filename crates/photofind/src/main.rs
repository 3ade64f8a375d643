//! # photofind CLI
//!
//! Command-line interface for photofind, natural-language search over a
//! personal photo library.
//!
//! ## Commands
//!
//! - `photofind index <PATH>` - Catalog a photo directory
//! - `photofind search <QUERY>` - Search the catalog in plain English
//! - `photofind status` - Show catalog statistics
//! - `photofind config show` - Show effective configuration
//!
//! ## Examples
//!
//! ```bash
//! # Catalog a photo tree
//! photofind index ~/Pictures
//!
//! # Search it
//! photofind search "all pictures from July 2023"
//! photofind search "red shirt 2021" --limit 20
//!
//! # Catalog-only mode, no embeddings
//! INDEX_MODE=FAST photofind index ~/Pictures
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use photofind::config::{default_config_path, Config, EmbedderBackend};
use photofind::ingest::ingest_tree;
use photofind_core::{Catalog, Embedder, PhotoRecord};
use photofind_embed::{HashEmbedder, NoopEmbedder};
use photofind_query::SearchEngine;
use photofind_store::{MemoryCatalog, MemoryVectorIndex};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "photofind")]
#[command(about = "Natural-language search over a personal photo library")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/photofind/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Catalog a photo directory
    Index {
        /// Directory to scan for photos
        path: PathBuf,
    },

    /// Search the catalog
    Search {
        /// Free-text query, e.g. "red shirt July 2023"
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show catalog statistics
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for search results.
#[derive(Serialize)]
struct SearchOutput {
    query: String,
    results: Vec<ResultItem>,
}

#[derive(Serialize)]
struct ResultItem {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    taken: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

impl ResultItem {
    fn from_record(record: &PhotoRecord) -> Self {
        Self {
            path: record.path.to_string_lossy().to_string(),
            taken: record.ts.map(|t| t.to_rfc3339()),
            caption: record.caption.clone(),
            tags: record.tag_list(),
        }
    }
}

/// Output structure for status.
#[derive(Serialize)]
struct StatusOutput {
    total_photos: u64,
    total_faces: u64,
    indexed_photos: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
}

fn open_catalog(config: &Config) -> Result<Arc<MemoryCatalog>> {
    let path = config.catalog_path()?;
    if path.exists() {
        Ok(Arc::new(
            MemoryCatalog::load(&path)
                .with_context(|| format!("loading catalog from {}", path.display()))?,
        ))
    } else {
        Ok(Arc::new(MemoryCatalog::new()))
    }
}

fn open_index(config: &Config) -> Result<Arc<MemoryVectorIndex>> {
    let path = config.vectors_path()?;
    if path.exists() {
        Ok(Arc::new(
            MemoryVectorIndex::load(&path)
                .with_context(|| format!("loading vector index from {}", path.display()))?,
        ))
    } else {
        Ok(Arc::new(MemoryVectorIndex::new(
            config.embedding.dimension,
        )))
    }
}

fn make_embedder(config: &Config) -> Arc<dyn Embedder> {
    match config.embedding.backend {
        EmbedderBackend::Hash => Arc::new(HashEmbedder::new(config.embedding.dimension)),
        EmbedderBackend::Noop => {
            Arc::new(NoopEmbedder::with_dimension(config.embedding.dimension))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    match cli.command {
        Commands::Index { path } => {
            if !path.exists() {
                anyhow::bail!("directory does not exist: {}", path.display());
            }
            let path = path.canonicalize()?;
            info!(path = %path.display(), mode = ?config.mode, "indexing");

            let catalog = open_catalog(&config)?;
            let summary = if config.mode.is_full() {
                let index = open_index(&config)?;
                let embedder = make_embedder(&config);
                let summary =
                    ingest_tree(&path, catalog.as_ref(), Some((embedder.as_ref(), index.as_ref())))
                        .await?;
                std::fs::create_dir_all(config.resolve_data_dir()?)?;
                index.save(&config.vectors_path()?).await?;
                summary
            } else {
                let summary = ingest_tree(&path, catalog.as_ref(), None).await?;
                std::fs::create_dir_all(config.resolve_data_dir()?)?;
                summary
            };
            catalog.save(&config.catalog_path()?).await?;

            println!(
                "Cataloged {} photos ({} indexed, {} skipped)",
                summary.cataloged, summary.indexed, summary.skipped
            );
        }

        Commands::Search { query, limit } => {
            let query = query.join(" ");
            let limit = limit.unwrap_or(config.query.default_limit);

            let catalog = open_catalog(&config)?;
            let engine = if config.mode.is_full() {
                let index = open_index(&config)?;
                let embedder = make_embedder(&config);
                SearchEngine::full(catalog, embedder, index)
            } else {
                SearchEngine::fast(catalog)
            };

            let results = engine.search_with_limit(&query, limit).await;

            match cli.format {
                OutputFormat::Json => {
                    let output = SearchOutput {
                        query: query.clone(),
                        results: results.iter().map(ResultItem::from_record).collect(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    if results.is_empty() {
                        println!("No results for \"{query}\".");
                    } else {
                        for (i, record) in results.iter().enumerate() {
                            print!("{}. {}", i + 1, record.path.display());
                            if let Some(ts) = record.ts {
                                print!("  ({})", ts.format("%Y-%m-%d"));
                            }
                            println!();
                            if let Some(caption) = &record.caption {
                                println!("   {caption}");
                            }
                        }
                    }
                }
            }
        }

        Commands::Status => {
            let catalog_path = config.catalog_path()?;
            if !catalog_path.exists() {
                match cli.format {
                    OutputFormat::Json => println!(r#"{{"error": "catalog not found"}}"#),
                    OutputFormat::Text => {
                        println!("No catalog found at {}", catalog_path.display());
                        println!("Run 'photofind index <PATH>' to create one.");
                    }
                }
                return Ok(());
            }

            let catalog = open_catalog(&config)?;
            let stats = catalog.stats().await.context("reading catalog stats")?;

            match cli.format {
                OutputFormat::Json => {
                    let output = StatusOutput {
                        total_photos: stats.total_photos,
                        total_faces: stats.total_faces,
                        indexed_photos: stats.indexed_photos,
                        last_updated: stats.last_updated.map(|t| t.to_rfc3339()),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!("Catalog status");
                    println!("  Photos:  {}", stats.total_photos);
                    println!("  Faces:   {}", stats.total_faces);
                    println!("  Indexed: {}", stats.indexed_photos);
                    if let Some(last) = stats.last_updated {
                        println!("  Updated: {}", last.format("%Y-%m-%d %H:%M:%S"));
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                OutputFormat::Text => {
                    println!("{}", toml::to_string_pretty(&config)?);
                }
            },
            ConfigAction::Init => {
                println!("{}", toml::to_string_pretty(&Config::default())?);
            }
            ConfigAction::Path => {
                if let Some(path) = default_config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(())
}
