//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files and the
//! environment via the `config` crate. Each sub-module represents a
//! logical configuration section, and every field has a default so an
//! empty configuration is valid.

pub mod cache;
pub mod generator;
pub mod learning;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::generator::GeneratorConfig;
use self::learning::LearningConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// External content generator settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Supported languages and level bounds.
    #[serde(default)]
    pub learning: LearningConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Sources, lowest precedence first: the file at `path`, the overlay
    /// `config/{LEARNHUB_ENV}.toml`, variables prefixed with `LEARNHUB__`,
    /// and finally the conventional `REDIS_URL`, `OPENAI_API_KEY` and
    /// `OPENAI_MODEL` variables. Missing files are skipped.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("LEARNHUB_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LEARNHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option("generator.api_key", std::env::var("OPENAI_API_KEY").ok())?
            .set_override_option("generator.model", std::env::var("OPENAI_MODEL").ok())?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a TOML document, without consulting the
    /// environment.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
