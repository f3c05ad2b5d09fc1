//! Configuration module for netresource
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - System configuration (/etc/netresource/netresource.toml)
//! - User configuration (~/.netresource.toml)
//! - Project configuration (./netresource.toml)
//! - Environment variables
//! - Command-line arguments

use crate::error::Error;
use crate::modules::network::State;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const KNOWN_OUTPUTS: &[&str] = &["human", "json", "yaml"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings
    pub defaults: Defaults,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Colors and output settings
    pub colors: ColorsConfig,
}

/// Default configuration values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// State used when a run does not name one
    pub state: String,

    /// Output format (human, json or yaml)
    pub output: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            state: "merged".to_string(),
            output: "human".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no -v flag is given
    pub level: String,

    /// Log format (plain or json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "plain".to_string(),
        }
    }
}

/// Color settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Enable colors
    pub enabled: bool,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                config = config.merge_from_file(&path)?;
            } else if config_path == Some(&path) {
                bail!("Config file not found: {}", path.display());
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Get the list of configuration file paths to check, lowest priority
    /// first
    fn get_config_paths(explicit_path: Option<&PathBuf>) -> Vec<PathBuf> {
        // Explicit path takes priority
        if let Some(path) = explicit_path {
            return vec![path.clone()];
        }

        if let Ok(env_config) = std::env::var("NETRESOURCE_CONFIG") {
            return vec![PathBuf::from(env_config)];
        }

        let mut paths = vec![PathBuf::from("/etc/netresource/netresource.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".netresource.toml"));
        }
        paths.push(PathBuf::from("netresource.toml"));
        paths
    }

    /// Merge configuration from a file
    fn merge_from_file(&self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let file_config: Config = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        Ok(self.merge(file_config))
    }

    /// Merge another config into this one; values left at their default in
    /// `other` keep the current value.
    fn merge(&self, other: Config) -> Config {
        let defaults = Config::default();
        let pick = |theirs: String, ours: &String, default: &String| {
            if &theirs != default {
                theirs
            } else {
                ours.clone()
            }
        };

        Config {
            defaults: Defaults {
                state: pick(
                    other.defaults.state,
                    &self.defaults.state,
                    &defaults.defaults.state,
                ),
                output: pick(
                    other.defaults.output,
                    &self.defaults.output,
                    &defaults.defaults.output,
                ),
            },
            logging: LoggingConfig {
                level: pick(
                    other.logging.level,
                    &self.logging.level,
                    &defaults.logging.level,
                ),
                format: pick(
                    other.logging.format,
                    &self.logging.format,
                    &defaults.logging.format,
                ),
            },
            colors: ColorsConfig {
                enabled: self.colors.enabled && other.colors.enabled,
            },
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // NETRESOURCE_STATE
        if let Some(state) = lookup("NETRESOURCE_STATE") {
            self.defaults.state = state.to_lowercase();
        }

        // NETRESOURCE_OUTPUT
        if let Some(output) = lookup("NETRESOURCE_OUTPUT") {
            self.defaults.output = output.to_lowercase();
        }

        // NETRESOURCE_LOG_LEVEL
        if let Some(level) = lookup("NETRESOURCE_LOG_LEVEL") {
            self.logging.level = level;
        }

        // NETRESOURCE_LOG_FORMAT
        if let Some(format) = lookup("NETRESOURCE_LOG_FORMAT") {
            self.logging.format = format.to_lowercase();
        }

        // NO_COLOR
        if lookup("NO_COLOR").is_some() {
            self.colors.enabled = false;
        }
    }

    /// Reject values no command could use
    pub fn validate(&self) -> crate::Result<()> {
        if let Err(e) = self.defaults.state.parse::<State>() {
            return Err(Error::invalid_config("defaults.state", e.to_string()));
        }
        if !KNOWN_OUTPUTS.contains(&self.defaults.output.as_str()) {
            return Err(Error::invalid_config(
                "defaults.output",
                format!("unknown output format '{}'", self.defaults.output),
            ));
        }
        if !matches!(self.logging.format.as_str(), "plain" | "json") {
            return Err(Error::invalid_config(
                "logging.format",
                format!("unknown log format '{}'", self.logging.format),
            ));
        }
        Ok(())
    }

    /// Whether logs should be emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.logging.format == "json"
    }

    /// Load from a specific file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::default().merge_from_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }
}
