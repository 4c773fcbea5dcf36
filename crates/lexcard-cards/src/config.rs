//! Configuration for the Card Generator

use serde::{Deserialize, Serialize};

/// Smallest allowed `max_cards_per_item`
pub const MIN_CARDS_PER_ITEM: usize = 1;

/// Largest allowed `max_cards_per_item`
pub const MAX_CARDS_PER_ITEM: usize = 5;

/// Configuration for the Card Generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Upper bound on cards kept per item
    pub max_cards_per_item: usize,

    /// Sampling temperature for card calls
    pub temperature: f32,

    /// Maximum concurrent model calls
    pub max_concurrency: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_cards_per_item: 3,
            temperature: 0.2,
            max_concurrency: 4,
        }
    }
}

impl GeneratorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_CARDS_PER_ITEM..=MAX_CARDS_PER_ITEM).contains(&self.max_cards_per_item) {
            return Err(format!(
                "max_cards_per_item must be between {} and {}",
                MIN_CARDS_PER_ITEM, MAX_CARDS_PER_ITEM
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        Ok(())
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
