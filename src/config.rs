//! Configuration system for the enrollment portal
//!
//! Supports multiple configuration sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (ENROLL_* prefix)
//! 2. Configuration file (TOML)
//! 3. Default values
//!
//! The Gemini API key deliberately does NOT live here: it is read from
//! the process environment at call time, and its absence is a generation
//! failure rather than a startup error.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Main portal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Bio generation settings
    pub generator: GeneratorSettings,

    /// Profile picture limits
    pub picture: PictureSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Bio generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// API base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Profile picture limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureSettings {
    /// Maximum accepted picture size in bytes
    pub max_bytes: usize,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorSettings::default(),
            picture: PictureSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for PictureSettings {
    fn default() -> Self {
        Self {
            // 5 MiB ceiling on attached pictures
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl PortalConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        let config_file = Self::find_config_file(config_path)?;
        if let Some(path) = config_file {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| source_read_error(&path, e))?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: e.to_string(),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let expanded = shellexpand::tilde(path);
            let path = PathBuf::from(expanded.as_ref());
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        // Search in standard locations
        let search_paths = [
            PathBuf::from("enroll.toml"),
            dirs::config_dir()
                .map(|p| p.join("enroll").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &search_paths {
            if path.as_os_str().is_empty() {
                continue;
            }
            if path.exists() {
                return Ok(Some(path.clone()));
            }
        }

        Ok(None)
    }

    /// Apply ENROLL_* environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("ENROLL_GENERATOR_BASE_URL") {
            self.generator.base_url = v;
        }
        if let Ok(v) = env::var("ENROLL_GENERATOR_MODEL") {
            self.generator.model = v;
        }
        if let Ok(v) = env::var("ENROLL_GENERATOR_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse() {
                self.generator.timeout_secs = secs;
            }
        }
        if let Ok(v) = env::var("ENROLL_PICTURE_MAX_BYTES") {
            if let Ok(bytes) = v.parse() {
                self.picture.max_bytes = bytes;
            }
        }
        if let Ok(v) = env::var("ENROLL_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = env::var("ENROLL_LOG_FILE") {
            self.logging.file = if v.is_empty() { None } else { Some(v) };
        }
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.generator.base_url.is_empty() {
            return Err(Error::config_field_invalid(
                "generator.base_url",
                "base URL must not be empty",
            ));
        }
        if !self.generator.base_url.starts_with("http://")
            && !self.generator.base_url.starts_with("https://")
        {
            return Err(Error::config_field_invalid(
                "generator.base_url",
                "base URL must start with http:// or https://",
            ));
        }
        if self.generator.model.is_empty() {
            return Err(Error::config_field_invalid(
                "generator.model",
                "model must not be empty",
            ));
        }
        if self.generator.timeout_secs == 0 {
            return Err(Error::config_field_invalid(
                "generator.timeout_secs",
                "timeout must be at least 1 second",
            ));
        }
        if self.picture.max_bytes == 0 {
            return Err(Error::config_field_invalid(
                "picture.max_bytes",
                "picture size ceiling must be non-zero",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "warning", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!("'{}' is not a valid log level", self.logging.level),
            ));
        }

        Ok(())
    }

    /// Serialize the configuration to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write a default configuration file
    pub fn init(path: &Path, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            return Err(Error::Config(format!(
                "Configuration file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = Self::default().to_toml()?;
        fs::write(path, content).map_err(|e| Error::IoWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(path.to_path_buf())
    }

    /// Default location for a new configuration file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("enroll").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("enroll.toml"))
    }
}

fn source_read_error(path: &Path, e: std::io::Error) -> Error {
    Error::IoRead {
        path: path.to_path_buf(),
        source: e,
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
