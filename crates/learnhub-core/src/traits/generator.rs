//! Content generator trait for the external text-generation capability.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::prompt::Prompt;

/// An opaque generator that turns a [`Prompt`] into a JSON document.
#[async_trait]
pub trait ContentGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Run the prompt and return the parsed JSON object.
    async fn generate(&self, prompt: &Prompt) -> AppResult<Value>;

    /// Check that the generator API is reachable and accepts our credentials.
    async fn check_connection(&self) -> AppResult<bool>;
}
