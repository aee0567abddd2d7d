//! Common error types for songbase

use thiserror::Error;

/// Common result type for songbase operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across songbase crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag-reader message could not be encoded or decoded
    #[error("Message encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file is not valid TOML
    #[error("Configuration parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested song not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
