//! Export error types

use thiserror::Error;

/// Errors that can occur while writing a package
#[derive(Error, Debug)]
pub enum ExportError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Collection database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Package archive error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Collection metadata could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Deck name cannot be used as a file name
    #[error("Invalid deck name: {0:?}")]
    InvalidDeckName(String),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
