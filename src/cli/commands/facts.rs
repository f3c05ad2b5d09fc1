//! Facts command - Gather resource facts from a captured device

use super::{load_device, CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use netresource::facts::Facts;
use netresource::modules::network::NetworkDeviceConnection;
use std::path::PathBuf;

/// Arguments for the facts command
#[derive(Parser, Debug, Clone)]
pub struct FactsArgs {
    /// Captured `show running-config` output acting as the device
    #[arg(long, short = 'd', required = true)]
    pub device: PathBuf,

    /// Resources to gather (comma separated; all when omitted)
    #[arg(long, short = 'r', value_delimiter = ',')]
    pub resources: Vec<String>,
}

impl Runnable for FactsArgs {
    fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let device = load_device(&self.device)?;
        let facts = Facts::gather(&device, &self.resources)?;

        if ctx.output.is_structured() {
            ctx.output.document(&facts)?;
            return Ok(0);
        }

        ctx.output.banner(&format!("FACTS: {}", device.identifier()));
        for (resource, value) in facts.all() {
            ctx.output.section(resource);
            ctx.output.document(value)?;
        }
        Ok(0)
    }
}
