//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Settings for the optional semantic re-extraction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Run the pass when keyword extraction yields fewer items than this.
    /// `None` disables the pass.
    pub trigger_below: Option<usize>,

    /// Segment size (characters)
    pub segment_size: usize,

    /// Overlap between segments (characters)
    pub overlap: usize,

    /// Upper bound on segments read per document
    pub max_segments: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            trigger_below: None,
            segment_size: 15_000,
            overlap: 1_000,
            max_segments: 10,
        }
    }
}

impl SemanticConfig {
    /// Whether the pass should run after `found` primary items
    pub fn should_run(&self, found: usize) -> bool {
        self.trigger_below.is_some_and(|n| found < n)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.segment_size == 0 {
            return Err("semantic.segment_size must be greater than 0".to_string());
        }
        if self.overlap >= self.segment_size {
            return Err("semantic.overlap must be smaller than semantic.segment_size".to_string());
        }
        if self.max_segments == 0 {
            return Err("semantic.max_segments must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Extraction window size (characters)
    pub chunk_size: usize,

    /// Overlap between extraction windows (characters)
    pub chunk_overlap: usize,

    /// Window size for keyword-free raw-text items (characters)
    pub raw_chunk_size: usize,

    /// Overlap between raw-text windows (characters)
    pub raw_chunk_overlap: usize,

    /// Sampling temperature for extraction calls
    pub temperature: f32,

    /// Maximum concurrent model calls
    pub max_concurrency: usize,

    /// Optional semantic re-extraction pass
    pub semantic: SemanticConfig,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be smaller than chunk_size".to_string());
        }
        if self.raw_chunk_size == 0 {
            return Err("raw_chunk_size must be greater than 0".to_string());
        }
        if self.raw_chunk_overlap >= self.raw_chunk_size {
            return Err("raw_chunk_overlap must be smaller than raw_chunk_size".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        self.semantic.validate()
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            chunk_size: 12_000,
            chunk_overlap: 500,
            raw_chunk_size: 1_000,
            raw_chunk_overlap: 100,
            temperature: 0.0,
            max_concurrency: 4,
            semantic: SemanticConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Thorough preset: smaller windows with more overlap, semantic pass on
    pub fn thorough() -> Self {
        Self {
            chunk_size: 8_000,
            chunk_overlap: 800,
            raw_chunk_size: 800,
            raw_chunk_overlap: 150,
            temperature: 0.0,
            max_concurrency: 4,
            semantic: SemanticConfig {
                trigger_below: Some(3),
                ..SemanticConfig::default()
            },
        }
    }

    /// Fast preset: larger windows and more parallel calls
    pub fn fast() -> Self {
        Self {
            chunk_size: 16_000,
            chunk_overlap: 400,
            raw_chunk_size: 1_500,
            raw_chunk_overlap: 100,
            temperature: 0.0,
            max_concurrency: 8,
            semantic: SemanticConfig::default(),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
