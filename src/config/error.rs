//! Configuration error types

use thiserror::Error;

use crate::domain::consolidation::WeightingTableError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to read weighting table {path}: {source}")]
    WeightingTableIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid weighting table: {0}")]
    WeightingTable(#[from] WeightingTableError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("max_save_retries exceeds maximum allowed (10)")]
    TooManyRetries,

    #[error("Invalid log filter '{0}'")]
    InvalidLogFilter(String),

    #[error("Invalid consolidation policy: {0}")]
    InvalidPolicy(#[from] crate::domain::foundation::ValidationError),
}
