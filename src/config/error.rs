//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Decimal place must be between 0 and {max}, got {value}")]
    InvalidDecimalPlace { value: u8, max: u8 },

    #[error("Cut point must be a finite number")]
    InvalidCutPoint,

    #[error("Tau must be a finite number of at least 1, got {0}")]
    InvalidTau(f64),

    #[error("Unknown log level directive: {0}")]
    InvalidLogLevel(String),
}
