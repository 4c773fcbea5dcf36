//! Result module - the output of one pipeline run

use crate::{Card, Document, ExtractedItem};
use serde::{Deserialize, Serialize};

/// Counters collected over one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Documents loaded
    pub documents_loaded: usize,

    /// Chunks sent to the model (or turned into raw-text items)
    pub chunks_processed: usize,

    /// Items extracted
    pub items_extracted: usize,

    /// Cards produced by the generator before filtering
    pub cards_generated: usize,

    /// Cards removed by the quality gate
    pub dropped_low_quality: usize,

    /// Cards removed as near-duplicates
    pub dropped_duplicates: usize,

    /// Cards in the final result
    pub cards_kept: usize,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl PipelineStats {
    /// Generate a summary report
    pub fn summary(&self) -> String {
        let lines = [
            "Pipeline Summary".to_string(),
            "================".to_string(),
            format!("Documents loaded:      {}", self.documents_loaded),
            format!("Chunks processed:      {}", self.chunks_processed),
            format!("Items extracted:       {}", self.items_extracted),
            format!("Cards generated:       {}", self.cards_generated),
            format!("Dropped (low quality): {}", self.dropped_low_quality),
            format!("Dropped (duplicate):   {}", self.dropped_duplicates),
            format!("Cards kept:            {}", self.cards_kept),
            format!("Elapsed:               {}ms", self.elapsed_ms),
        ];
        lines.join("\n")
    }
}

/// Output of one pipeline run
///
/// Always well-formed: fatal failures leave every list empty and put a single
/// message in `errors`; stage failures add a message and leave that stage's
/// output empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Documents that were loaded
    pub documents: Vec<Document>,

    /// Items extracted from the documents
    #[serde(rename = "extracted_items")]
    pub extracted_items: Vec<ExtractedItem>,

    /// Cards that passed the quality gate and deduplication
    pub cards: Vec<Card>,

    /// Human-readable stage errors, in the order they occurred
    pub errors: Vec<String>,

    /// Run counters
    #[serde(default)]
    pub stats: PipelineStats,
}

impl PipelineResult {
    /// A result carrying only a fatal error
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Self::default()
        }
    }

    /// Whether any stage reported an error
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_result_is_empty() {
        let result = PipelineResult::fatal("Configuration error: api_key is empty");
        assert!(result.documents.is_empty());
        assert!(result.extracted_items.is_empty());
        assert!(result.cards.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.has_errors());
    }

    #[test]
    fn test_summary_lists_counters() {
        let stats = PipelineStats {
            documents_loaded: 2,
            cards_kept: 7,
            ..Default::default()
        };
        let summary = stats.summary();
        assert!(summary.contains("Documents loaded:      2"));
        assert!(summary.contains("Cards kept:            7"));
    }
}
