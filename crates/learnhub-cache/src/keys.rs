//! Cache key builders for all LearnHub cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. Keys are colon-separated,
//! most general segment first, so glob patterns can select a whole
//! content kind, a language, or a single chapter.

use crate::pattern::escape;

/// Namespace for generated concept explanations.
pub const CONCEPT: &str = "concept";

/// Namespace for generated practice questions.
pub const QUESTION: &str = "question";

// ── Content keys ───────────────────────────────────────────

/// Cache key for the concept explanation of a chapter in a language.
pub fn concept(language: &str, chapter_id: u32) -> String {
    format!("{CONCEPT}:{language}:{chapter_id}")
}

/// Cache key for a practice question at a given level.
pub fn question(language: &str, chapter_id: u32, level: u8) -> String {
    format!("{QUESTION}:{language}:{chapter_id}:{level}")
}

// ── Invalidation patterns ──────────────────────────────────

/// Pattern matching every concept explanation for a language.
pub fn concept_language_pattern(language: &str) -> String {
    format!("{CONCEPT}:{}:*", escape(language))
}

/// Pattern matching every practice question for a language.
pub fn question_language_pattern(language: &str) -> String {
    format!("{QUESTION}:{}:*", escape(language))
}

/// Pattern matching the concept explanation of a chapter in every language.
pub fn concept_chapter_pattern(chapter_id: u32) -> String {
    format!("{CONCEPT}:*:{chapter_id}")
}

/// Pattern matching every practice question of a chapter, all languages and levels.
pub fn question_chapter_pattern(chapter_id: u32) -> String {
    format!("{QUESTION}:*:{chapter_id}:*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::matches;

    #[test]
    fn test_concept_key() {
        assert_eq!(concept("python", 1), "concept:python:1");
    }

    #[test]
    fn test_question_key() {
        assert_eq!(question("java", 3, 7), "question:java:3:7");
    }

    #[test]
    fn test_chapter_patterns_do_not_leak_into_other_chapters() {
        let concepts = concept_chapter_pattern(1);
        assert!(matches(&concepts, &concept("python", 1)));
        assert!(matches(&concepts, &concept("cpp", 1)));
        assert!(!matches(&concepts, &concept("python", 10)));

        let questions = question_chapter_pattern(1);
        assert!(matches(&questions, &question("python", 1, 10)));
        assert!(!matches(&questions, &question("python", 11, 1)));
    }

    #[test]
    fn test_language_patterns() {
        assert!(matches(
            &concept_language_pattern("python"),
            &concept("python", 4)
        ));
        assert!(!matches(
            &concept_language_pattern("python"),
            &question("python", 4, 1)
        ));
        assert!(matches(
            &question_language_pattern("csharp"),
            &question("csharp", 2, 9)
        ));
    }
}
