//! Run command - Execute one resource module
//!
//! This module implements the `run` subcommand. The want tree comes from a
//! YAML/JSON file and the device is a captured running configuration, so the
//! module always runs in check mode.

use super::{load_device, load_text, load_tree, CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use netresource::error::Error;
use netresource::modules::network::NetworkDeviceConnection;
use netresource::modules::{ModuleContext, ModuleError, ModuleParams, ModuleRegistry};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Arguments for the run command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Module to run (e.g. iosxr_bgp_global)
    #[arg(required = true)]
    pub module: String,

    /// State to drive the module with (defaults to the configured one)
    #[arg(long, short = 's')]
    pub state: Option<String>,

    /// YAML or JSON file holding the desired configuration tree
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Running configuration text to parse (state parsed)
    #[arg(long)]
    pub running_config: Option<PathBuf>,

    /// Captured `show running-config` output acting as the device
    #[arg(long, short = 'd')]
    pub device: Option<PathBuf>,

    /// Include a diff in the result
    #[arg(long, short = 'D')]
    pub diff: bool,
}

impl RunArgs {
    fn params(&self, ctx: &CommandContext) -> Result<ModuleParams, Error> {
        let mut params = ModuleParams::new();
        if let Some(path) = &self.config {
            params.insert("config".to_string(), load_tree(path)?);
        }
        if let Some(path) = &self.running_config {
            params.insert("running_config".to_string(), Value::String(load_text(path)?));
        }
        let state = self
            .state
            .clone()
            .unwrap_or_else(|| ctx.config.defaults.state.clone());
        params.insert("state".to_string(), Value::String(state));
        Ok(params)
    }
}

impl Runnable for RunArgs {
    fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let registry = ModuleRegistry::with_builtins();
        if !registry.contains(&self.module) {
            return Err(Error::ModuleNotFound(self.module.clone()).into());
        }

        let params = self.params(ctx)?;
        let mut context = ModuleContext::new()
            .with_check_mode(true)
            .with_diff_mode(self.diff);

        let device = match &self.device {
            Some(path) => {
                let device: Arc<dyn NetworkDeviceConnection> = Arc::new(load_device(path)?);
                context = context.with_connection(Arc::clone(&device));
                device.identifier()
            }
            None => "local".to_string(),
        };

        debug!(module = %self.module, device = %device, "running module");
        ctx.output.banner(&format!("MODULE: {}", self.module));
        ctx.output.info("Running in check mode; the captured device is read-only");

        let output = registry
            .execute(&self.module, &params, &context)
            .map_err(|e| match e {
                ModuleError::NotFound(name) => Error::ModuleNotFound(name),
                other => Error::module(&self.module, other),
            })?;

        if ctx.output.is_structured() {
            ctx.output.document(&output)?;
            return Ok(0);
        }

        ctx.output.module_result(&device, &output);

        for key in ["commands", "rendered"] {
            if let Some(Value::Array(items)) = output.data.get(key) {
                let commands: Vec<String> = items
                    .iter()
                    .filter_map(|c| c.as_str().map(String::from))
                    .collect();
                if !commands.is_empty() {
                    ctx.output.section("Commands");
                    ctx.output.commands(&commands);
                }
            }
        }

        for key in ["parsed", "gathered"] {
            if let Some(facts) = output.data.get(key) {
                ctx.output.section("Facts");
                ctx.output.document(facts)?;
            }
        }

        if let Some(diff) = &output.diff {
            ctx.output.section("Before");
            println!("{}", diff.before);
        }

        Ok(0)
    }
}
