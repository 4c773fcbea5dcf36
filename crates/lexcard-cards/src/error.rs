//! Error types for the Card Generator

use thiserror::Error;

/// Errors that can occur during card generation
///
/// A failed or malformed reply only costs the cards of that one item; the
/// only batch-level failure is misconfiguration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
