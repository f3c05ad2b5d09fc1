//! List command - Show the registered resource modules

use super::{CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use netresource::modules::ModuleRegistry;
use serde::Serialize;

/// Arguments for the list command
#[derive(Parser, Debug, Clone, Default)]
pub struct ListArgs {}

#[derive(Debug, Serialize)]
struct ModuleSummary {
    name: &'static str,
    description: &'static str,
    states: Vec<&'static str>,
}

impl Runnable for ListArgs {
    fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let registry = ModuleRegistry::with_builtins();
        let summaries: Vec<ModuleSummary> = registry
            .names()
            .into_iter()
            .filter_map(|name| registry.get(name))
            .map(|module| ModuleSummary {
                name: module.name(),
                description: module.description(),
                states: module.states(),
            })
            .collect();

        if ctx.output.is_structured() {
            ctx.output.document(&summaries)?;
            return Ok(0);
        }

        let rows: Vec<Vec<String>> = summaries
            .iter()
            .map(|s| {
                vec![
                    s.name.to_string(),
                    s.states.join(","),
                    s.description.to_string(),
                ]
            })
            .collect();
        ctx.output.table(&["MODULE", "STATES", "DESCRIPTION"], &rows);
        Ok(0)
    }
}
