//! Cache-aside orchestration of content generation.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use learnhub_cache::CacheManager;
use learnhub_cache::keys;
use learnhub_core::config::learning::LearningConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::traits::generator::ContentGenerator;
use learnhub_core::types::Prompt;

use crate::fallback;
use crate::prompts;
use crate::types::{Cached, Chapter, CodeSubmission};

/// Serves generated learning content, caching what the generator returns.
#[derive(Debug, Clone)]
pub struct ContentService {
    cache: Arc<CacheManager>,
    generator: Arc<dyn ContentGenerator>,
    learning: LearningConfig,
}

impl ContentService {
    /// Create a new content service.
    pub fn new(
        cache: Arc<CacheManager>,
        generator: Arc<dyn ContentGenerator>,
        learning: LearningConfig,
    ) -> Self {
        Self {
            cache,
            generator,
            learning,
        }
    }

    /// The cache shared with this service.
    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    /// Concept explanation for `chapter` in `language`.
    pub async fn concept(&self, chapter: &Chapter, language: &str) -> AppResult<Cached<Value>> {
        let language = self.validate_language(language)?;
        let key = keys::concept(language, chapter.id);

        Ok(self
            .cached_or_generate(
                &key,
                prompts::concept(chapter, language),
                |_| {},
                || fallback::concept(chapter, language),
            )
            .await)
    }

    /// Practice question for `chapter` at `level` in `language`.
    pub async fn question(
        &self,
        chapter: &Chapter,
        level: u8,
        language: &str,
    ) -> AppResult<Cached<Value>> {
        let language = self.validate_language(language)?;
        self.validate_level(level)?;
        let key = keys::question(language, chapter.id, level);

        Ok(self
            .cached_or_generate(
                &key,
                prompts::question(chapter, level, language),
                |value| {
                    if let Some(object) = value.as_object_mut() {
                        object.insert("generated_level".to_string(), Value::from(level));
                    }
                },
                || fallback::question(chapter, level, language),
            )
            .await)
    }

    /// Review a submitted solution. Reviews are never cached.
    pub async fn analyze_code(&self, submission: &CodeSubmission) -> AppResult<Value> {
        self.validate_language(&submission.language)?;
        if submission.code.trim().is_empty() {
            return Err(AppError::validation("Submitted code is empty"));
        }

        let prompt = prompts::code_analysis(submission);
        Ok(self
            .generate_or(&prompt, "code analysis", fallback::code_analysis)
            .await)
    }

    /// Recommend what to study next. Recommendations are never cached.
    pub async fn recommendation(
        &self,
        completed_chapters: &[Value],
        performance: &Value,
        language: &str,
    ) -> AppResult<Value> {
        let language = self.validate_language(language)?;
        let prompt = prompts::recommendation(completed_chapters, performance, language);
        Ok(self
            .generate_or(&prompt, "recommendation", fallback::recommendation)
            .await)
    }

    /// Drop every cached concept and question for a chapter.
    pub async fn invalidate_chapter(&self, chapter_id: u32) -> u64 {
        let removed = self
            .cache
            .clear_pattern(&keys::concept_chapter_pattern(chapter_id))
            .await
            + self
                .cache
                .clear_pattern(&keys::question_chapter_pattern(chapter_id))
                .await;
        info!(chapter_id, removed, "Invalidated chapter content");
        removed
    }

    /// Drop every cached concept and question for a language.
    pub async fn invalidate_language(&self, language: &str) -> AppResult<u64> {
        let language = self.validate_language(language)?;
        let removed = self
            .cache
            .clear_pattern(&keys::concept_language_pattern(language))
            .await
            + self
                .cache
                .clear_pattern(&keys::question_language_pattern(language))
                .await;
        info!(language, removed, "Invalidated language content");
        Ok(removed)
    }

    /// Whether the generator API is reachable.
    pub async fn generator_available(&self) -> bool {
        self.generator.check_connection().await.unwrap_or_else(|e| {
            warn!(error = %e, "Content generator connection check failed");
            false
        })
    }

    fn validate_language<'a>(&self, language: &'a str) -> AppResult<&'a str> {
        if self.learning.supports(language) {
            Ok(language)
        } else {
            Err(AppError::validation(format!(
                "Unsupported language '{language}'. Supported: {}",
                self.learning.supported_languages.join(", ")
            )))
        }
    }

    fn validate_level(&self, level: u8) -> AppResult<()> {
        let (min, max) = (self.learning.min_level, self.learning.max_level);
        if (min..=max).contains(&level) {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Level must be between {min} and {max}, got {level}"
            )))
        }
    }

    /// Serve `key` from the cache, or generate, post-process and cache it.
    /// Fallback content is returned uncached so the next request retries.
    async fn cached_or_generate(
        &self,
        key: &str,
        prompt: Prompt,
        finish: impl FnOnce(&mut Value),
        fallback: impl FnOnce() -> Value,
    ) -> Cached<Value> {
        if let Some(value) = self.cache.get::<Value>(key).await {
            debug!(key, "Content cache hit");
            return Cached::hit(value);
        }

        match self.generator.generate(&prompt).await {
            Ok(mut value) => {
                finish(&mut value);
                if !self.cache.set(key, &value).await {
                    debug!(key, "Generated content was not cached");
                }
                Cached::fresh(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Content generation failed, serving fallback");
                Cached::fresh(fallback())
            }
        }
    }

    async fn generate_or(
        &self,
        prompt: &Prompt,
        what: &str,
        fallback: impl FnOnce() -> Value,
    ) -> Value {
        self.generator.generate(prompt).await.unwrap_or_else(|e| {
            warn!(what, error = %e, "Content generation failed, serving fallback");
            fallback()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use learnhub_core::config::cache::CacheConfig;
    use learnhub_core::error::ErrorKind;

    /// Generator that answers with a fixed document, or always fails.
    #[derive(Debug, Default)]
    struct ScriptedGenerator {
        fail: bool,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &Prompt) -> AppResult<Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(AppError::external_service("upstream timed out"));
            }
            Ok(json!({"title": format!("generated #{n}"), "max_tokens": prompt.max_tokens}))
        }

        async fn check_connection(&self) -> AppResult<bool> {
            if self.fail {
                Err(AppError::external_service("unreachable"))
            } else {
                Ok(true)
            }
        }
    }

    fn service(generator: Arc<ScriptedGenerator>) -> ContentService {
        let cache = Arc::new(CacheManager::new(&CacheConfig::memory()).unwrap());
        ContentService::new(cache, generator, LearningConfig::default())
    }

    fn arrays() -> Chapter {
        Chapter::new(1, "Arrays", vec!["indexing".to_string()])
    }

    #[tokio::test]
    async fn test_concept_generated_then_cached() {
        let generator = Arc::new(ScriptedGenerator::default());
        let service = service(generator.clone());

        let first = service.concept(&arrays(), "python").await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.value["title"], "generated #1");

        let second = service.concept(&arrays(), "python").await.unwrap();
        assert!(second.cached);
        assert_eq!(second.value, first.value);
        assert_eq!(generator.calls(), 1);

        let cached: Option<Value> = service.cache().get(&keys::concept("python", 1)).await;
        assert_eq!(cached, Some(first.value));
    }

    #[tokio::test]
    async fn test_languages_cached_separately() {
        let generator = Arc::new(ScriptedGenerator::default());
        let service = service(generator.clone());

        service.concept(&arrays(), "python").await.unwrap();
        let java = service.concept(&arrays(), "java").await.unwrap();
        assert!(!java.cached);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let generator = Arc::new(ScriptedGenerator::failing());
        let service = service(generator.clone());

        let first = service.concept(&arrays(), "python").await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.value["title"], "Arrays - Beginner Concepts");

        let second = service.concept(&arrays(), "python").await.unwrap();
        assert!(!second.cached);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_question_records_level() {
        let generator = Arc::new(ScriptedGenerator::default());
        let service = service(generator.clone());

        let question = service.question(&arrays(), 3, "cpp").await.unwrap();
        assert_eq!(question.value["generated_level"], 3);
        assert_eq!(question.value["max_tokens"], 3000);

        let again = service.question(&arrays(), 3, "cpp").await.unwrap();
        assert!(again.cached);
        assert_eq!(again.value["generated_level"], 3);
    }

    #[tokio::test]
    async fn test_question_level_bounds() {
        let service = service(Arc::new(ScriptedGenerator::default()));

        for level in [0, 11] {
            let err = service.question(&arrays(), level, "python").await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
        assert!(service.question(&arrays(), 1, "python").await.is_ok());
        assert!(service.question(&arrays(), 10, "python").await.is_ok());
    }

    #[tokio::test]
    async fn test_unsupported_language() {
        let generator = Arc::new(ScriptedGenerator::default());
        let service = service(generator.clone());

        let err = service.concept(&arrays(), "cobol").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_chapter() {
        let service = service(Arc::new(ScriptedGenerator::default()));
        let other = Chapter::new(10, "Graphs", vec![]);

        service.concept(&arrays(), "python").await.unwrap();
        service.concept(&arrays(), "java").await.unwrap();
        service.question(&arrays(), 2, "python").await.unwrap();
        service.concept(&other, "python").await.unwrap();

        assert_eq!(service.invalidate_chapter(1).await, 3);
        assert!(!service.concept(&arrays(), "python").await.unwrap().cached);
        assert!(service.concept(&other, "python").await.unwrap().cached);
    }

    #[tokio::test]
    async fn test_invalidate_language() {
        let service = service(Arc::new(ScriptedGenerator::default()));

        service.concept(&arrays(), "python").await.unwrap();
        service.question(&arrays(), 5, "python").await.unwrap();
        service.concept(&arrays(), "java").await.unwrap();

        assert_eq!(service.invalidate_language("python").await.unwrap(), 2);
        assert!(service.concept(&arrays(), "java").await.unwrap().cached);
    }

    #[tokio::test]
    async fn test_analysis_uncached_with_fallback() {
        let generator = Arc::new(ScriptedGenerator::failing());
        let service = service(generator.clone());
        let submission = CodeSubmission {
            code: "print(1)".to_string(),
            question_description: "Print one".to_string(),
            test_cases: vec![],
            language: "python".to_string(),
        };

        let review = service.analyze_code(&submission).await.unwrap();
        assert_eq!(review["is_correct"], false);
        service.analyze_code(&submission).await.unwrap();
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_analysis_rejects_empty_code() {
        let service = service(Arc::new(ScriptedGenerator::default()));
        let submission = CodeSubmission {
            code: "   ".to_string(),
            question_description: "Anything".to_string(),
            test_cases: vec![],
            language: "python".to_string(),
        };
        let err = service.analyze_code(&submission).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_recommendation() {
        let service = service(Arc::new(ScriptedGenerator::default()));
        let value = service
            .recommendation(&[json!({"chapter": "Arrays"})], &json!({}), "python")
            .await
            .unwrap();
        assert_eq!(value["max_tokens"], 1500);

        let fallback = service_with_failure()
            .recommendation(&[], &json!({}), "python")
            .await
            .unwrap();
        assert_eq!(fallback["next_chapter"], "Arrays & Strings");
    }

    fn service_with_failure() -> ContentService {
        service(Arc::new(ScriptedGenerator::failing()))
    }

    #[tokio::test]
    async fn test_generator_available() {
        assert!(service(Arc::new(ScriptedGenerator::default())).generator_available().await);
        assert!(!service_with_failure().generator_available().await);
    }
}
