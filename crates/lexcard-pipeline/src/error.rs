//! Pipeline error types
//!
//! Each variant renders with the prefix of the stage it belongs to, so the
//! `Display` text can go straight into `PipelineResult::errors`.

use lexcard_cards::GeneratorError;
use lexcard_extractor::ExtractorError;
use lexcard_gatekeeper::GatekeeperError;
use thiserror::Error;

/// Errors raised by pipeline stages
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration (fatal)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source files could not be read (fatal)
    #[error("Failed to read files: {0}")]
    Ingest(String),

    /// Keyword extraction failed
    #[error("Extraction stage failed: {0}")]
    Extraction(#[source] ExtractorError),

    /// Keyword-free chunking failed
    #[error("Text chunking failed: {0}")]
    Chunking(#[source] ExtractorError),

    /// Card generation failed
    #[error("Card generation stage failed: {0}")]
    Generation(#[from] GeneratorError),

    /// Quality gate or deduplication failed
    #[error("Quality filter/dedup failed: {0}")]
    Gate(#[from] GatekeeperError),
}

impl PipelineError {
    /// Whether the error ends the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Config(_) | PipelineError::Ingest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_prefixes() {
        let err = PipelineError::Config("api_key is empty".to_string());
        assert_eq!(err.to_string(), "Configuration error: api_key is empty");
        assert!(err.is_fatal());

        let err = PipelineError::Chunking(ExtractorError::InvalidChunking { size: 0, overlap: 0 });
        assert!(err.to_string().starts_with("Text chunking failed: "));
        assert!(!err.is_fatal());

        let err = PipelineError::Generation(GeneratorError::Config("bad".to_string()));
        assert!(err.to_string().starts_with("Card generation stage failed: "));
    }
}
