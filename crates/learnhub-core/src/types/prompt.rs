//! Prompt passed to a content generator.

use serde::{Deserialize, Serialize};

/// A single system + user prompt with sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// System message establishing the generator's role.
    pub system: String,
    /// User message describing the content to produce.
    pub user: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl Prompt {
    /// Create a prompt with the given messages and sampling parameters.
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            max_tokens,
        }
    }
}
