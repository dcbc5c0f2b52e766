//! Error types for application start-up.

use std::path::PathBuf;

/// Errors raised while loading configuration or building the context.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The configuration file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The database could not be reached.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The log subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type for application start-up.
pub type Result<T> = std::result::Result<T, AppError>;
