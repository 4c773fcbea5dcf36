//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Model failures and malformed model output are not errors: they reduce the
/// affected chunk to zero items. Only misconfiguration stops a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// Chunk window that cannot make progress
    #[error("Invalid chunking: overlap {overlap} must be smaller than chunk size {size}")]
    InvalidChunking {
        /// Window size in characters
        size: usize,
        /// Overlap in characters
        overlap: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
