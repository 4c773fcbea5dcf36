//! Gatekeeper configuration

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted range for `min_quality`
pub const MIN_QUALITY_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Accepted range for `dedup_threshold`
pub const DEDUP_THRESHOLD_RANGE: RangeInclusive<f64> = 0.5..=0.99;

/// Configuration for the quality gate and deduplicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Cards scoring below this are dropped
    pub min_quality: f64,

    /// Cards at least this similar to an earlier card are dropped
    pub dedup_threshold: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_quality: 0.65,
            dedup_threshold: 0.88,
        }
    }
}

impl GateConfig {
    /// Create a permissive configuration (keeps more cards)
    pub fn permissive() -> Self {
        Self {
            min_quality: 0.3,
            dedup_threshold: 0.95,
        }
    }

    /// Create a strict configuration (keeps fewer, more distinct cards)
    pub fn strict() -> Self {
        Self {
            min_quality: 0.8,
            dedup_threshold: 0.75,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !MIN_QUALITY_RANGE.contains(&self.min_quality) {
            return Err(format!(
                "min_quality must be between 0.0 and 1.0, got {}",
                self.min_quality
            ));
        }
        if !DEDUP_THRESHOLD_RANGE.contains(&self.dedup_threshold) {
            return Err(format!(
                "dedup_threshold must be between 0.5 and 0.99, got {}",
                self.dedup_threshold
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.min_quality, 0.65);
        assert_eq!(config.dedup_threshold, 0.88);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(GateConfig::permissive().validate().is_ok());
        assert!(GateConfig::strict().validate().is_ok());
    }

    #[test]
    fn test_range_boundaries() {
        let at = |min_quality, dedup_threshold| GateConfig { min_quality, dedup_threshold }.validate();

        assert!(at(0.0, 0.5).is_ok());
        assert!(at(1.0, 0.99).is_ok());
        assert!(at(-0.1, 0.88).is_err());
        assert!(at(1.1, 0.88).is_err());
        assert!(at(0.65, 0.49).is_err());
        assert!(at(0.65, 1.0).is_err());
        assert!(at(f64::NAN, 0.88).is_err());
    }
}
