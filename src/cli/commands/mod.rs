//! Subcommands module for netresource CLI
//!
//! This module contains all the subcommand implementations.

pub mod facts;
pub mod list;
pub mod run;

use crate::cli::output::OutputFormatter;
use crate::cli::{Cli, OutputFormat};
use anyhow::Result;
use netresource::config::Config;
use netresource::error::Error;
use netresource::modules::network::CapturedConfig;
use std::path::Path;

/// Common context shared between commands
pub struct CommandContext {
    /// Configuration
    pub config: Config,
    /// Output formatter
    pub output: OutputFormatter,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &Cli, config: Config) -> Self {
        let format = cli
            .output
            .or_else(|| OutputFormat::from_config(&config.defaults.output))
            .unwrap_or_default();
        let use_color = !cli.no_color && config.colors.enabled;
        let output = OutputFormatter::new(use_color, format, cli.verbosity());

        Self { config, output }
    }
}

/// Trait for runnable commands
pub trait Runnable {
    /// Execute the command, returning the process exit code
    fn execute(&self, ctx: &mut CommandContext) -> Result<i32>;
}

/// Load a tree from a YAML or JSON file.
///
/// YAML is a superset of JSON, so any extension other than `.json` is read
/// as YAML.
pub fn load_tree(path: &Path) -> Result<serde_json::Value, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");

    let value = if is_json {
        serde_json::from_str(&content).map_err(|e| Error::input_load(path, e.to_string()))?
    } else {
        serde_yaml::from_str(&content).map_err(|e| Error::input_load(path, e.to_string()))?
    };
    Ok(value)
}

/// Read a text file such as a captured running configuration
pub fn load_text(path: &Path) -> Result<String, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Open captured device output as a read-only connection
pub fn load_device(path: &Path) -> Result<CapturedConfig, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    CapturedConfig::from_file(path).map_err(|e| Error::input_load(path, e.to_string()))
}
