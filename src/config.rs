//! Configuration file support.
//!
//! The configuration carries the two closed label sets offered by the editor
//! (object tags and interaction labels) together with user preferences and
//! key bindings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LABEL_ROOT;
use crate::editor::LabelSets;
use crate::keybindings::KeyBindings;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Tags offered when an object box is finished
    #[serde(default)]
    pub objects: Vec<String>,

    /// Labels offered when two boxes are linked
    #[serde(default)]
    pub interactions: Vec<String>,

    #[serde(default)]
    pub preferences: UserPreferences,

    #[serde(default)]
    pub keybindings: KeyBindings,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Start new images with the previous image's annotations
    #[serde(default)]
    pub carry_forward: bool,

    /// Directory under which one label folder per image folder is created
    #[serde(default = "default_label_root")]
    pub label_root: PathBuf,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_label_root() -> PathBuf {
    PathBuf::from(DEFAULT_LABEL_ROOT)
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            carry_forward: false,
            label_root: default_label_root(),
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            objects: Vec::new(),
            interactions: Vec::new(),
            preferences: UserPreferences::default(),
            keybindings: KeyBindings::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    ///
    /// Label lists are sorted and de-duplicated.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        let labels = config.label_sets();
        config.objects = labels.objects().to_vec();
        config.interactions = labels.interactions().to_vec();
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded configuration from {:?}: {} objects, {} interactions",
            path,
            config.objects.len(),
            config.interactions.len()
        );
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// The label sets offered by the editor.
    pub fn label_sets(&self) -> LabelSets {
        LabelSets::new(self.objects.iter().cloned(), self.interactions.iter().cloned())
    }

    pub fn default_filename() -> &'static str {
        "hoi-label-config.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("hoi-label").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("hoi-label")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config =
            AppConfig::from_json(r#"{"objects": ["cup", "bike", "cup"], "interactions": ["ride"]}"#)
                .unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.objects, ["bike", "cup"]);
        assert_eq!(config.interactions, ["ride"]);
        assert!(!config.preferences.carry_forward);
        assert_eq!(config.preferences.label_root, PathBuf::from("Labels"));
        assert_eq!(config.keybindings, KeyBindings::default());
    }

    #[test]
    fn test_version_too_new() {
        let json = format!(r#"{{"version": {}}}"#, CONFIG_VERSION + 1);
        assert!(matches!(
            AppConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AppConfig::from_json("{"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::new();
        config.objects = vec!["cup".to_string()];
        config.interactions = vec!["hold".to_string()];
        config.preferences.carry_forward = true;
        config.preferences.log_level = LogLevel::Debug;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.preferences.log_level.to_level_filter(),
            log::LevelFilter::Debug
        );
    }

    #[test]
    fn test_label_sets() {
        let mut config = AppConfig::new();
        config.objects = vec!["cup".to_string(), "bike".to_string()];
        let sets = config.label_sets();
        assert_eq!(sets.objects(), ["bike", "cup"]);
        assert!(sets.interactions().is_empty());
    }
}
