//! Pipeline configuration

use crate::PipelineError;
use lexcard_cards::{GeneratorConfig, MAX_CARDS_PER_ITEM, MIN_CARDS_PER_ITEM};
use lexcard_extractor::ExtractorConfig;
use lexcard_gatekeeper::{GateConfig, DEDUP_THRESHOLD_RANGE, MIN_QUALITY_RANGE};
use serde::{Deserialize, Serialize};

/// Default model for both extraction and card generation
pub const DEFAULT_MODEL: &str = "DeepSeek-V3";

/// Configuration for one pipeline run
///
/// The top-level gate and card-count settings take precedence over the
/// nested sections when the run is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Base URL of the chat completions endpoint
    pub api_base: String,

    /// API key (never serialized)
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Model used for item extraction
    pub extract_model: String,

    /// Model used for card generation
    pub card_model: String,

    /// Similarity at or above which a card counts as a duplicate
    pub dedup_threshold: f64,

    /// Minimum card quality
    pub min_quality: f64,

    /// Upper bound on cards per item
    pub max_cards_per_item: usize,

    /// Chunking, concurrency and semantic-pass settings
    pub extractor: ExtractorConfig,

    /// Card generation settings
    pub generator: GeneratorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            extract_model: DEFAULT_MODEL.to_string(),
            card_model: DEFAULT_MODEL.to_string(),
            dedup_threshold: 0.88,
            min_quality: 0.65,
            max_cards_per_item: 3,
            extractor: ExtractorConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Default configuration for the given endpoint
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] for missing credentials or model
    /// names, out-of-range thresholds, or an invalid nested section.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let fail = |msg: String| Err(PipelineError::Config(msg));

        if self.api_base.trim().is_empty() {
            return fail("api_base is empty".to_string());
        }
        if self.api_key.trim().is_empty() {
            return fail("api_key is empty".to_string());
        }
        if self.extract_model.trim().is_empty() {
            return fail("extract_model is empty".to_string());
        }
        if self.card_model.trim().is_empty() {
            return fail("card_model is empty".to_string());
        }
        if !DEDUP_THRESHOLD_RANGE.contains(&self.dedup_threshold) {
            return fail(format!(
                "dedup_threshold must be between 0.5 and 0.99, got {}",
                self.dedup_threshold
            ));
        }
        if !MIN_QUALITY_RANGE.contains(&self.min_quality) {
            return fail(format!(
                "min_quality must be between 0.0 and 1.0, got {}",
                self.min_quality
            ));
        }
        if !(MIN_CARDS_PER_ITEM..=MAX_CARDS_PER_ITEM).contains(&self.max_cards_per_item) {
            return fail(format!(
                "max_cards_per_item must be between {} and {}, got {}",
                MIN_CARDS_PER_ITEM, MAX_CARDS_PER_ITEM, self.max_cards_per_item
            ));
        }
        self.extractor.validate().map_err(PipelineError::Config)?;
        self.generator_config()
            .validate()
            .map_err(PipelineError::Config)?;
        Ok(())
    }

    /// Generator settings with the top-level card limit applied
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            max_cards_per_item: self.max_cards_per_item,
            ..self.generator.clone()
        }
    }

    /// Gate settings from the top-level thresholds
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            min_quality: self.min_quality,
            dedup_threshold: self.dedup_threshold,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string (the API key is left out)
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize TOML: {}", e))
    }
}
