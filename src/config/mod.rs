//! Configuration module for sensorlog-sessions
//!
//! This module holds the settings that steer discovery:
//! - Which file suffixes count as archives and as tabular files
//! - The suffix used for extraction output directories
//! - The filename markers that identify sensor logs
//! - How deep nested archives are expanded
//!
//! # Config Location
//!
//! The command line tool looks for a config file in the platform-appropriate
//! location unless one is passed explicitly:
//! - **Linux**: `~/.config/dev.hxyulin.sensorlog-sessions/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.sensorlog-sessions/config.toml`
//! - **Windows**: `%APPDATA%\dev.hxyulin.sensorlog-sessions\config.toml`
//!
//! # Example
//!
//! ```ignore
//! use sensorlog_sessions::config::LoaderConfig;
//!
//! let config = LoaderConfig::load_or_default("sessions.toml");
//! config.save("sessions.toml")?;
//! ```

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.hxyulin.sensorlog-sessions";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Suffix appended to an archive filename to name its extraction directory
pub const DEFAULT_EXTRACTION_SUFFIX: &str = "_unzipped";

/// Suffix of tabular files considered for classification
pub const DEFAULT_TABULAR_SUFFIX: &str = ".csv";

/// Default limit for expanding archives found inside extracted archives
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 4;

/// Get the path of the default config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID).join(CONFIG_FILE))
}

/// Settings for archive expansion, file collection and classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Whether archives are expanded before collecting files
    #[serde(default = "default_true")]
    pub expand_archives: bool,

    /// Archive suffixes, matched case-insensitively
    #[serde(default = "default_archive_suffixes")]
    pub archive_suffixes: Vec<String>,

    /// Suffix of extraction output directories
    #[serde(default = "default_extraction_suffix")]
    pub extraction_suffix: String,

    /// Suffix of tabular files, matched case-insensitively
    #[serde(default = "default_tabular_suffix")]
    pub tabular_suffix: String,

    /// Filename markers that identify a sensor log
    #[serde(default = "default_log_name_markers")]
    pub log_name_markers: Vec<String>,

    /// Archives nested deeper than this inside extraction outputs stay packed
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Field delimiter of tabular files
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_true() -> bool {
    true
}

fn default_archive_suffixes() -> Vec<String> {
    [".zip", ".tar", ".tar.gz", ".tgz"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_extraction_suffix() -> String {
    DEFAULT_EXTRACTION_SUFFIX.to_string()
}

fn default_tabular_suffix() -> String {
    DEFAULT_TABULAR_SUFFIX.to_string()
}

fn default_log_name_markers() -> Vec<String> {
    vec!["sensorlog".to_string(), "sensor_log".to_string()]
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

fn default_delimiter() -> char {
    ','
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            expand_archives: true,
            archive_suffixes: default_archive_suffixes(),
            extraction_suffix: default_extraction_suffix(),
            tabular_suffix: default_tabular_suffix(),
            log_name_markers: default_log_name_markers(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            delimiter: ',',
        }
    }
}

impl LoaderConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SessionError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            SessionError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save config file to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SessionError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            SessionError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Check that suffixes are usable and the delimiter fits in one byte
    pub fn validate(&self) -> Result<()> {
        if self.extraction_suffix.is_empty() {
            return Err(SessionError::Config(
                "extraction_suffix must not be empty".to_string(),
            ));
        }
        if self.tabular_suffix.is_empty() {
            return Err(SessionError::Config(
                "tabular_suffix must not be empty".to_string(),
            ));
        }
        if self.archive_suffixes.iter().any(|s| s.is_empty()) {
            return Err(SessionError::Config(
                "archive_suffixes must not contain empty entries".to_string(),
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err(SessionError::Config(format!(
                "delimiter {:?} is not a single byte",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// Delimiter as the byte handed to the CSV reader
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }

    /// Check whether a file name carries one of the archive suffixes
    pub fn is_archive_name(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.archive_suffixes
            .iter()
            .any(|s| lower.ends_with(&s.to_lowercase()))
    }

    /// Check whether a file name carries the tabular suffix
    pub fn is_tabular_name(&self, file_name: &str) -> bool {
        file_name
            .to_lowercase()
            .ends_with(&self.tabular_suffix.to_lowercase())
    }

    /// Check whether a directory name marks an extraction output
    pub fn is_extraction_dir_name(&self, dir_name: &str) -> bool {
        dir_name.ends_with(&self.extraction_suffix)
    }
}
