//! Error types for sqlra.

use thiserror::Error;

/// The extractor could not find a `SELECT ... FROM ...` statement.
///
/// This is the only failure the translator has. It deliberately carries
/// no position or message: callers branch on it, they don't inspect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("query is not a parseable SELECT statement")]
pub struct NotParseable;

/// Errors raised outside the translator core (config, I/O, output).
#[derive(Debug, Error)]
pub enum SqlraError {
    /// The query text could not be translated.
    #[error(transparent)]
    NotParseable(#[from] NotParseable),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML in a config file.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON output error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlraError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for sqlra operations.
pub type SqlraResult<T> = Result<T, SqlraError>;
