//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading configuration and run inputs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// The pull request id file does not hold a pull request number.
    #[error("Expected a pull request number in '{path}', found '{content}'")]
    InvalidPrNumber { path: String, content: String },

    /// Validation error in settings.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// No GitHub token was provided.
    #[error("No GitHub token provided, pass --token or set GITHUB_TOKEN or GH_TOKEN")]
    MissingToken,
}
