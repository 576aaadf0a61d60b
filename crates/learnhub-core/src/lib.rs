//! # learnhub-core
//!
//! Core crate for LearnHub. Contains configuration schemas, the traits
//! that sit at the backend seams (cache stores, content generators),
//! shared types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LearnHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
