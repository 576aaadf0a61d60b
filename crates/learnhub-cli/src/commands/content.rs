//! Content CLI commands that go through the cache-aside service.

use std::sync::Arc;

use clap::Args;

use crate::output::{self, OutputFormat};
use learnhub_cache::CacheManager;
use learnhub_content::{Chapter, ContentService, OpenAiGenerator};
use learnhub_core::config::AppConfig;
use learnhub_core::result::AppResult;

/// Arguments for the concept command
#[derive(Debug, Args)]
pub struct ConceptArgs {
    /// Chapter identifier
    #[arg(long)]
    pub chapter_id: u32,
    /// Chapter name
    #[arg(long)]
    pub name: String,
    /// Topic covered by the chapter (repeatable)
    #[arg(long)]
    pub topic: Vec<String>,
    /// Programming language (defaults to learning.default_language)
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Arguments for the invalidate command
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct InvalidateArgs {
    /// Drop every concept and question cached for this chapter
    #[arg(long)]
    pub chapter_id: Option<u32>,
    /// Drop every concept and question cached for this language
    #[arg(long)]
    pub language: Option<String>,
}

fn content_service(cache: CacheManager, config: &AppConfig) -> AppResult<ContentService> {
    let generator = OpenAiGenerator::new(&config.generator)?;
    Ok(ContentService::new(
        Arc::new(cache),
        Arc::new(generator),
        config.learning.clone(),
    ))
}

/// Print a chapter's concept explanation, generating it on a miss
pub async fn concept(args: &ConceptArgs, cache: CacheManager, config: &AppConfig) -> AppResult<()> {
    let service = content_service(cache, config)?;
    let language = args
        .language
        .as_deref()
        .unwrap_or(&config.learning.default_language);
    let chapter = Chapter::new(args.chapter_id, args.name.clone(), args.topic.clone());

    let concept = service.concept(&chapter, language).await?;
    output::print_json(&concept);
    Ok(())
}

/// Drop cached content for a chapter or a language
pub async fn invalidate(
    args: &InvalidateArgs,
    cache: CacheManager,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let service = content_service(cache, config)?;

    let (removed, target) = match (&args.chapter_id, &args.language) {
        (Some(id), _) => (service.invalidate_chapter(*id).await, format!("chapter {id}")),
        (None, Some(language)) => (
            service.invalidate_language(language).await?,
            format!("language '{language}'"),
        ),
        (None, None) => (0, "nothing".to_string()),
    };

    output::print_success(&format!("Removed {removed} entries for {target}"), format);
    Ok(())
}
