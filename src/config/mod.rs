//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables or a configuration file using the `config` and `dotenvy` crates.
//! Environment variables use the `PROMETHEE_SORT__` prefix and nested values
//! use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use promethee_sort::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_tracing(&config.logging).expect("Invalid log level");
//!
//! println!("Rounding to {} places", config.pipeline.decimal_place);
//! ```

mod error;
mod logging;
mod pipeline;

pub use error::{ConfigError, ValidationError};
pub use logging::{init_tracing, LoggingConfig};
pub use pipeline::PipelineConfig;

use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "PROMETHEE_SORT";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Preference and classification settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Tracing output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PROMETHEE_SORT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PROMETHEE_SORT__PIPELINE__DECIMAL_PLACE=2` -> `pipeline.decimal_place = 2`
    /// - `PROMETHEE_SORT__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a file (format taken from its extension),
    /// with environment variables taking precedence.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pipeline.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::default()
        .prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
