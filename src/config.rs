//! Application settings for imagemark.
//!
//! Holds user preferences and the path of the last opened project, persisted
//! as a versioned JSON file in the platform config directory.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{APP_DIR_NAME, DEFAULT_PROJECT_NAME};

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
    pub fn to_level_filter(self) -> log::LevelFilter {
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

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Project opened or saved most recently
    #[serde(default)]
    pub last_project_path: Option<String>,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// File name used for new projects
    #[serde(default = "default_project_name")]
    pub default_project_name: String,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            default_project_name: default_project_name(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            last_project_path: None,
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "imagemark-config.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join(APP_DIR_NAME).join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join(APP_DIR_NAME)
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from `path`.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::debug!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading or saving configuration.
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

/// Where a new project is placed when nothing else was chosen.
pub fn default_project_path() -> PathBuf {
    default_project_path_named(DEFAULT_PROJECT_NAME)
}

/// Like [`default_project_path`] with a custom file name.
pub fn default_project_path_named(name: &str) -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join(APP_DIR_NAME).join(name),
        None => PathBuf::from(name),
    }
}

// ============================================================================
// Settings stores
// ============================================================================

/// Key/value settings consumed by the project manager.
pub trait SettingsStore {
    /// Path of the last opened or saved project, if any.
    fn last_project_path(&self) -> Option<String>;

    fn set_last_project_path(&self, path: &str) -> Result<(), ConfigError>;
}

/// Settings written back to a JSON config file on every change.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    config: RefCell<AppConfig>,
}

impl FileSettingsStore {
    /// Open the settings at `path`, starting from defaults when the file is
    /// missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = AppConfig::load_from(&path).unwrap_or_default();
        Self {
            path,
            config: RefCell::new(config),
        }
    }

    /// Open the settings at [`AppConfig::default_path`], if one exists on
    /// this platform.
    pub fn open_default() -> Option<Self> {
        AppConfig::default_path().map(Self::open)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current configuration.
    pub fn config(&self) -> AppConfig {
        self.config.borrow().clone()
    }
}

impl SettingsStore for FileSettingsStore {
    fn last_project_path(&self) -> Option<String> {
        self.config.borrow().last_project_path.clone()
    }

    fn set_last_project_path(&self, path: &str) -> Result<(), ConfigError> {
        let mut config = self.config.borrow().clone();
        config.last_project_path = Some(path.to_string());
        config.save_to(&self.path)?;
        *self.config.borrow_mut() = config;
        Ok(())
    }
}

/// Process-local settings that are never written anywhere.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    last_project_path: RefCell<Option<String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_project_path(path: impl Into<String>) -> Self {
        Self {
            last_project_path: RefCell::new(Some(path.into())),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn last_project_path(&self) -> Option<String> {
        self.last_project_path.borrow().clone()
    }

    fn set_last_project_path(&self, path: &str) -> Result<(), ConfigError> {
        *self.last_project_path.borrow_mut() = Some(path.to_string());
        Ok(())
    }
}
