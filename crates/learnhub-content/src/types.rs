//! Request and response types for content generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chapter of the curriculum. Callers own the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Stable chapter identifier, used in cache keys.
    pub id: u32,
    /// Display name, e.g. `"Arrays & Strings"`.
    pub name: String,
    /// Topics covered by the chapter.
    pub topics: Vec<String>,
    /// Audience difficulty for concept explanations.
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

impl Chapter {
    /// Create a chapter aimed at beginners.
    pub fn new(id: u32, name: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            topics,
            difficulty: default_difficulty(),
        }
    }
}

fn default_difficulty() -> String {
    "beginner".to_string()
}

/// A learner's solution submitted for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSubmission {
    /// Source code of the solution.
    pub code: String,
    /// Statement of the problem being solved.
    pub question_description: String,
    /// Test cases the solution is expected to pass.
    #[serde(default)]
    pub test_cases: Vec<Value>,
    /// Language the code is written in.
    pub language: String,
}

/// A value together with whether it was served from the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cached<T> {
    /// The content.
    pub value: T,
    /// `true` if the content came from the cache rather than the generator.
    pub cached: bool,
}

impl<T> Cached<T> {
    /// Content served from the cache.
    pub fn hit(value: T) -> Self {
        Self { value, cached: true }
    }

    /// Freshly generated (or fallback) content.
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            cached: false,
        }
    }
}
