//! Configuration system for the oxidized-retro frontend

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub core: CoreConfig,
    pub video: VideoConfig,
    pub paths: PathConfig,
    pub debug: DebugConfig,
}

/// Core selection settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CoreConfig {
    /// Path to a core library, or a directory to search for one
    pub path: PathBuf,
    /// Raw core variables, `key=value` pairs separated by `;`
    pub variables: String,
}

/// Video settings the negotiator consults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Identifier of the video driver to start with
    pub driver: String,
    pub crop_overscan: bool,
    pub allow_rotate: bool,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// BIOS/firmware directory exposed to cores; unset when `None`
    pub system_directory: Option<PathBuf>,
}

/// Debug settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: LogLevel,
}

/// Logging level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!("unknown log level \"{}\"", other)),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            driver: "gl".to_string(),
            crop_overscan: true,
            allow_rotate: true,
        }
    }
}

/// Read-only view of the settings the environment negotiator consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSettings {
    pub crop_overscan: bool,
    pub allow_rotate: bool,
    pub system_directory: Option<PathBuf>,
    pub variables: String,
    pub video_driver: String,
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)
    }

    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("oxidized-retro")
            .join("config.toml")
    }

    /// Settings snapshot handed to the environment negotiator at bind time
    pub fn environment_settings(&self) -> EnvironmentSettings {
        EnvironmentSettings {
            crop_overscan: self.video.crop_overscan,
            allow_rotate: self.video.allow_rotate,
            system_directory: self
                .paths
                .system_directory
                .clone()
                .filter(|dir| !dir.as_os_str().is_empty()),
            variables: self.core.variables.clone(),
            video_driver: self.video.driver.clone(),
        }
    }
}
