//! Output formatting module for netresource
//!
//! Provides colored human output and machine-readable JSON/YAML documents.

use super::OutputFormat;
use colored::Colorize;
use netresource::modules::{ModuleOutput, ModuleStatus};
use serde::Serialize;
use std::io::{self, Write};

/// Output formatter for different output modes
pub struct OutputFormatter {
    /// Use colored output
    use_color: bool,
    /// Output format
    format: OutputFormat,
    /// Verbosity level
    verbosity: u8,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(use_color: bool, format: OutputFormat, verbosity: u8) -> Self {
        Self {
            use_color,
            format,
            verbosity,
        }
    }

    /// Whether output is a machine-readable document
    pub fn is_structured(&self) -> bool {
        self.format != OutputFormat::Human
    }

    /// Print a serializable value as the single stdout document.
    ///
    /// In human mode the value is rendered as YAML.
    pub fn document<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let text = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml | OutputFormat::Human => serde_yaml::to_string(value)?,
        };
        println!("{}", text.trim_end());
        Ok(())
    }

    /// Print a banner/header
    pub fn banner(&self, title: &str) {
        if self.is_structured() {
            return;
        }

        let line = "=".repeat(title.len() + 4);
        if self.use_color {
            println!("{}", line.bright_blue());
            println!("{}", format!("  {}  ", title).bright_blue().bold());
            println!("{}", line.bright_blue());
        } else {
            println!("{}", line);
            println!("  {}  ", title);
            println!("{}", line);
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        if self.is_structured() {
            return;
        }

        if self.use_color {
            println!("\n{}", title.cyan().bold());
            println!("{}", "-".repeat(title.len()).cyan());
        } else {
            println!("\n{}", title);
            println!("{}", "-".repeat(title.len()));
        }
    }

    /// Print a module result line
    pub fn module_result(&self, device: &str, output: &ModuleOutput) {
        if self.is_structured() {
            return;
        }

        let status = match (output.status, self.use_color) {
            (ModuleStatus::Changed, true) => "changed".yellow().to_string(),
            (ModuleStatus::Ok, true) => "ok".green().to_string(),
            (status, false) => status.to_string(),
        };
        let device = if self.use_color {
            device.bright_white().bold().to_string()
        } else {
            device.to_string()
        };

        println!("{}: [{}] => {}", status, device, output.msg);
    }

    /// Print an ordered command list
    pub fn commands(&self, commands: &[String]) {
        if self.is_structured() {
            return;
        }

        for command in commands {
            if self.use_color {
                println!("  {}", command.yellow());
            } else {
                println!("  {}", command);
            }
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.is_structured() {
            let err = serde_json::json!({
                "type": "error",
                "message": message
            });
            eprintln!("{}", err);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "ERROR:".red().bold(), message);
        } else {
            eprintln!("ERROR: {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.is_structured() {
            let warn = serde_json::json!({
                "type": "warning",
                "message": message
            });
            eprintln!("{}", warn);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "WARNING:".yellow().bold(), message);
        } else {
            eprintln!("WARNING: {}", message);
        }
    }

    /// Print an info message (respects verbosity)
    pub fn info(&self, message: &str) {
        if self.verbosity < 1 || self.is_structured() {
            return;
        }

        if self.use_color {
            println!("{} {}", "INFO:".blue(), message);
        } else {
            println!("INFO: {}", message);
        }
    }

    /// Print a table
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        // Calculate column widths
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }

        let header_line = format_row(headers.iter().map(|h| h.to_string()), &widths);
        if self.use_color {
            println!("{}", header_line.bright_white().bold());
        } else {
            println!("{}", header_line);
        }

        let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        if self.use_color {
            println!("{}", sep.join("-+-").bright_black());
        } else {
            println!("{}", sep.join("-+-"));
        }

        for row in rows {
            println!("{}", format_row(row.iter().cloned(), &widths));
        }
    }

    /// Flush stdout
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

fn format_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
