//! Shared types.

pub mod prompt;

pub use prompt::Prompt;
