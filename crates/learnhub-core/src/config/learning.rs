//! Learning content constraints.

use serde::{Deserialize, Serialize};

/// Languages and difficulty bounds accepted by the content service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Programming languages content can be generated for.
    #[serde(default = "default_languages")]
    pub supported_languages: Vec<String>,
    /// Language used when the caller does not name one.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Lowest practice question level.
    #[serde(default = "default_min_level")]
    pub min_level: u8,
    /// Highest practice question level.
    #[serde(default = "default_max_level")]
    pub max_level: u8,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            supported_languages: default_languages(),
            default_language: default_language(),
            min_level: default_min_level(),
            max_level: default_max_level(),
        }
    }
}

impl LearningConfig {
    /// Whether `language` is one of the supported languages.
    pub fn supports(&self, language: &str) -> bool {
        self.supported_languages.iter().any(|l| l == language)
    }
}

fn default_languages() -> Vec<String> {
    ["python", "java", "javascript", "cpp", "csharp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_language() -> String {
    "python".to_string()
}

fn default_min_level() -> u8 {
    1
}

fn default_max_level() -> u8 {
    10
}
