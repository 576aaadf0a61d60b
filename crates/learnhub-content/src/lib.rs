//! # learnhub-content
//!
//! Generates data-structures-and-algorithms learning content through an
//! external text-generation API and caches it. The [`ContentService`]
//! checks the cache, builds a prompt on a miss, asks the configured
//! [`ContentGenerator`](learnhub_core::traits::generator::ContentGenerator)
//! for a JSON document, and writes the result back. When generation fails
//! a static fallback document is served instead and nothing is cached.

pub mod difficulty;
pub mod fallback;
pub mod openai;
pub mod prompts;
pub mod service;
pub mod types;

pub use openai::OpenAiGenerator;
pub use service::ContentService;
pub use types::{Cached, Chapter, CodeSubmission};
