//! CLI command definitions and dispatch.

pub mod cache;
pub mod content;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::output::OutputFormat;
use learnhub_cache::CacheManager;
use learnhub_core::config::AppConfig;
use learnhub_core::result::AppResult;

/// Inspect and maintain the LearnHub content cache
#[derive(Debug, Parser)]
#[command(name = "learnhub-cachectl", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which backend is serving and whether it is healthy
    Status,
    /// Print the JSON stored under a key
    Get {
        /// Cache key
        key: String,
    },
    /// Store a JSON document under a key
    Set {
        /// Cache key
        key: String,
        /// JSON document to store
        value: String,
        /// Time to live in seconds (defaults to cache.default_ttl_seconds)
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Remove a key
    Delete {
        /// Cache key
        key: String,
    },
    /// Remove every key matching a Redis glob pattern
    Clear {
        /// Glob pattern, e.g. `concept:python:*`
        pattern: String,
    },
    /// Fetch a chapter's concept explanation through the cache
    Concept(content::ConceptArgs),
    /// Drop cached content for a chapter or a language
    Invalidate(content::InvalidateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        debug!(command = ?self.command, provider = %config.cache.provider, "Executing command");
        let manager = CacheManager::new(&config.cache)?;

        match &self.command {
            Commands::Status => cache::status(&manager, self.format).await,
            Commands::Get { key } => cache::get(&manager, key).await,
            Commands::Set { key, value, ttl } => {
                cache::set(&manager, key, value, *ttl, self.format).await
            }
            Commands::Delete { key } => cache::delete(&manager, key, self.format).await,
            Commands::Clear { pattern } => cache::clear(&manager, pattern, self.format).await,
            Commands::Concept(args) => content::concept(args, manager, config).await,
            Commands::Invalidate(args) => {
                content::invalidate(args, manager, config, self.format).await
            }
        }
    }
}
