//! Traits at the backend seams.

pub mod cache;
pub mod generator;
