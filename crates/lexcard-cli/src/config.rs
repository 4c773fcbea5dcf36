//! Configuration management for the CLI.
//!
//! The file lives at `~/.lexcard/config.toml` unless `--config` points
//! elsewhere. API keys are never written to it.

use crate::error::{CliError, Result};
use lexcard_pipeline::{PipelineConfig, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Base URL of the default profile
pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Model endpoint profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Chat completions base URL
    pub api_base: String,

    /// Model used for extraction
    #[serde(default = "default_model")]
    pub extract_model: String,

    /// Model used for card generation
    #[serde(default = "default_model")]
    pub card_model: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Minimum card quality
    #[serde(default = "default_min_quality")]
    pub min_quality: f64,

    /// Near-duplicate threshold
    #[serde(default = "default_dedup_threshold")]
    pub dedup_threshold: f64,

    /// Maximum cards per extracted item
    #[serde(default = "default_max_cards")]
    pub max_cards_per_item: usize,

    /// Directory for exported packages
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".lexcard").join("config.toml"))
    }

    /// Load configuration from the default path or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or the default when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }

    /// Remove a profile other than the active one.
    ///
    /// Returns whether the profile existed.
    pub fn remove_profile(&mut self, name: &str) -> Result<bool> {
        if name == self.active_profile {
            return Err(CliError::NotPermitted(
                "Cannot delete the active profile".to_string(),
            ));
        }
        Ok(self.profiles.remove(name).is_some())
    }

    /// Pipeline settings from the active profile and global settings
    pub fn pipeline_config(&self, api_key: &str) -> Result<PipelineConfig> {
        let profile = self.get_active_profile()?;
        let mut config = PipelineConfig::new(&profile.api_base, api_key);
        config.extract_model = profile.extract_model.clone();
        config.card_model = profile.card_model.clone();
        config.min_quality = self.settings.min_quality;
        config.dedup_threshold = self.settings.dedup_threshold;
        config.max_cards_per_item = self.settings.max_cards_per_item;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "default".to_string(),
            Profile {
                api_base: DEFAULT_API_BASE.to_string(),
                extract_model: default_model(),
                card_model: default_model(),
            },
        );

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            min_quality: default_min_quality(),
            dedup_threshold: default_dedup_threshold(),
            max_cards_per_item: default_max_cards(),
            export_dir: default_export_dir(),
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_min_quality() -> f64 {
    0.65
}

fn default_dedup_threshold() -> f64 {
    0.88
}

fn default_max_cards() -> usize {
    3
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_profile, "default");
        assert_eq!(config.get_active_profile().unwrap().card_model, "DeepSeek-V3");
        assert!(config.settings.color);
        assert_eq!(config.settings.min_quality, 0.65);
    }

    #[test]
    fn test_profile_management() {
        let mut config = Config::default();

        let profile = Profile {
            api_base: "https://llm.example.com/v1".to_string(),
            extract_model: "DeepSeek-R1".to_string(),
            card_model: "DeepSeek-V3".to_string(),
        };

        config.set_profile("test".to_string(), profile);
        assert!(config.profiles.contains_key("test"));

        config.switch_profile("test".to_string()).unwrap();
        assert_eq!(config.active_profile, "test");

        assert!(config.remove_profile("default").unwrap());
        assert!(!config.remove_profile("default").unwrap());
    }

    #[test]
    fn test_switch_to_nonexistent_profile() {
        let mut config = Config::default();
        let result = config.switch_profile("nonexistent".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_cannot_remove_active_profile() {
        let mut config = Config::default();
        let err = config.remove_profile("default").unwrap_err();
        assert!(matches!(err, CliError::NotPermitted(_)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.min_quality = 0.4;
        config.settings.format = OutputFormat::Json;
        config.save_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("api_key"));

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.settings.min_quality, 0.4);
        assert_eq!(loaded.settings.format, OutputFormat::Json);
        assert_eq!(loaded.profiles, config.profiles);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.active_profile, "default");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "active_profile = \"work\"\n\n[profiles.work]\napi_base = \"https://llm.example.com/v1\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.extract_model, "DeepSeek-V3");
        assert_eq!(config.settings.max_cards_per_item, 3);
        assert_eq!(config.settings.export_dir, PathBuf::from("exports"));
    }

    #[test]
    fn test_pipeline_config_from_profile() {
        let mut config = Config::default();
        config.settings.dedup_threshold = 0.9;

        let pipeline = config.pipeline_config("sk-test").unwrap();
        assert_eq!(pipeline.api_base, DEFAULT_API_BASE);
        assert_eq!(pipeline.api_key, "sk-test");
        assert_eq!(pipeline.dedup_threshold, 0.9);
        assert!(pipeline.validate().is_ok());
    }
}
