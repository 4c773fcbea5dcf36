//! Ingest error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading source documents
#[derive(Error, Debug)]
pub enum IngestError {
    /// File could not be read
    #[error("{path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// PDF text extraction failed
    #[error("{path}: PDF extraction failed: {message}")]
    Pdf {
        /// File that failed
        path: PathBuf,
        /// Reason reported by the PDF reader
        message: String,
    },

    /// DOCX archive or XML could not be read
    #[error("{path}: DOCX extraction failed: {message}")]
    Docx {
        /// File that failed
        path: PathBuf,
        /// Reason reported by the archive or XML reader
        message: String,
    },

    /// Extension not handled by this loader
    #[error("{0}: unsupported file type")]
    Unsupported(PathBuf),
}

/// Result type for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;
