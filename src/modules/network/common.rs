//! Common network resource utilities and types
//!
//! This module provides the shared pieces every resource module builds on:
//! - The state policy (`State`) a reconciliation run is executed under
//! - Configuration tree helpers (deep merge, empty pruning, dotted lookup)
//! - The device connection abstraction and a captured-output implementation

use crate::modules::{ModuleError, ModuleResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

// ============================================================================
// State Policy
// ============================================================================

/// Declared intent of one resource module invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Merge want into the device configuration
    #[default]
    Merged,
    /// Replace the listed entries with want
    Replaced,
    /// Make the device match want exactly
    Overridden,
    /// Remove the listed (or all) entries
    Deleted,
    /// Remove the whole resource with one collapsing command
    Purged,
    /// Render want as commands without a device
    Rendered,
    /// Parse supplied running-config text into facts
    Parsed,
    /// Gather facts from the device
    Gathered,
}

impl State {
    /// Every state, in declaration order.
    pub const ALL: [State; 8] = [
        State::Merged,
        State::Replaced,
        State::Overridden,
        State::Deleted,
        State::Purged,
        State::Rendered,
        State::Parsed,
        State::Gathered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            State::Merged => "merged",
            State::Replaced => "replaced",
            State::Overridden => "overridden",
            State::Deleted => "deleted",
            State::Purged => "purged",
            State::Rendered => "rendered",
            State::Parsed => "parsed",
            State::Gathered => "gathered",
        }
    }

    /// States that produce a command list rather than facts
    pub fn produces_commands(&self) -> bool {
        !matches!(self, State::Parsed | State::Gathered)
    }

    /// States that need a configuration tree from the caller
    pub fn requires_config(&self) -> bool {
        matches!(
            self,
            State::Merged | State::Replaced | State::Overridden | State::Rendered
        )
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for State {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        State::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| {
                ModuleError::InvalidParameter(format!(
                    "Invalid state '{}'. Valid states: merged, replaced, overridden, deleted, purged, rendered, parsed, gathered",
                    s
                ))
            })
    }
}

// ============================================================================
// Configuration Tree Helpers
// ============================================================================

/// Whether a value carries no configuration (`null`, `""`, `{}` or `[]`).
///
/// `false` and `0` are real values and are not considered empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Recursively drop empty values from a tree.
pub fn remove_empties(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pruned = Map::new();
            for (key, item) in map {
                let item = remove_empties(item);
                if !is_empty_value(&item) {
                    pruned.insert(key.clone(), item);
                }
            }
            Value::Object(pruned)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(remove_empties)
                .filter(|item| !is_empty_value(item))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Deep-merge `other` onto `base`.
///
/// Keys of `base` keep their position and new keys of `other` follow in
/// their own order. Nested objects merge recursively, lists are unioned in
/// order, scalars from `other` win, and a `null` in `other` keeps the base
/// value.
pub fn dict_merge(base: &Value, other: &Value) -> Value {
    let (base_map, other_map) = match (base, other) {
        (Value::Object(b), Value::Object(o)) => (b, o),
        (_, Value::Null) => return base.clone(),
        _ => return other.clone(),
    };

    let mut combined = Map::new();
    for (key, value) in base_map {
        let merged = match other_map.get(key) {
            None | Some(Value::Null) => value.clone(),
            Some(item) => match (value, item) {
                (Value::Object(_), Value::Object(_)) => dict_merge(value, item),
                (Value::Array(existing), Value::Array(extra)) => {
                    let mut union = existing.clone();
                    for entry in extra {
                        if !union.contains(entry) {
                            union.push(entry.clone());
                        }
                    }
                    Value::Array(union)
                }
                _ => item.clone(),
            },
        };
        combined.insert(key.clone(), merged);
    }
    for (key, value) in other_map {
        if !combined.contains_key(key) && !value.is_null() {
            combined.insert(key.clone(), value.clone());
        }
    }
    Value::Object(combined)
}

/// Look up a dotted path (`bgp.router_id`) in a tree.
///
/// Missing keys, non-object intermediates and `null` leaves all read as
/// absent.
pub fn get_from_dict<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Mutable counterpart of [`get_from_dict`]; never creates intermediate keys.
pub fn get_from_dict_mut<'a>(data: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Build `{key: body}` as a tree value.
pub fn nest(key: impl Into<String>, body: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.into(), body);
    Value::Object(map)
}

// ============================================================================
// Device Connection
// ============================================================================

/// The collaborator that talks to a network device.
///
/// Transport, sessions and credentials live behind this trait; the engine
/// only ever asks for command output and hands back a command list.
pub trait NetworkDeviceConnection: Send + Sync {
    /// A short identifier for logging (usually the hostname)
    fn identifier(&self) -> String;

    /// Run a show command and return its raw output
    fn get(&self, command: &str) -> ModuleResult<String>;

    /// Push configuration commands, in order, in configuration mode
    fn edit_config(&self, commands: &[String]) -> ModuleResult<()> {
        Err(ModuleError::Unsupported(format!(
            "{} is read-only; cannot apply {} command(s)",
            self.identifier(),
            commands.len()
        )))
    }
}

/// A read-only connection that replays captured `show running-config` output.
#[derive(Debug, Clone)]
pub struct CapturedConfig {
    hostname: String,
    content: String,
}

impl CapturedConfig {
    pub fn new(hostname: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            content: clean_config_output(&content.into()),
        }
    }

    /// Load captured output from a file, named after the file stem.
    pub fn from_file(path: impl AsRef<Path>) -> ModuleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let hostname = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "captured".to_string());
        Ok(Self::new(hostname, content))
    }
}

impl NetworkDeviceConnection for CapturedConfig {
    fn identifier(&self) -> String {
        self.hostname.clone()
    }

    fn get(&self, command: &str) -> ModuleResult<String> {
        if !command.starts_with("show running-config") {
            return Err(ModuleError::Unsupported(format!(
                "captured device '{}' only answers 'show running-config', not '{}'",
                self.hostname, command
            )));
        }
        Ok(self.content.clone())
    }
}

/// Strip command echo, banner and prompt lines from captured CLI output.
pub fn clean_config_output(output: &str) -> String {
    let mut lines: Vec<&str> = output.lines().collect();

    if lines.first().is_some_and(|first| is_command_echo(first)) {
        lines.remove(0);
    }
    lines.retain(|line| {
        let trimmed = line.trim();
        !trimmed.starts_with("Building configuration")
            && !trimmed.starts_with("!! IOS XR Configuration")
            && !trimmed.starts_with("!! Last configuration change")
    });

    while let Some(last) = lines.last() {
        let last = last.trim();
        if last.ends_with('#') || last.ends_with('>') || last.is_empty() || last == "end" {
            lines.pop();
        } else {
            break;
        }
    }

    lines.join("\n")
}

/// A `show ...` line, bare or behind a device prompt such as
/// `RP/0/RP0/CPU0:xr1#`.
fn is_command_echo(line: &str) -> bool {
    let line = line.trim_start();
    if line.starts_with("show ") {
        return true;
    }
    line.split_once(|c| c == '#' || c == '>')
        .is_some_and(|(prompt, command)| {
            !prompt.is_empty()
                && !prompt.contains(char::is_whitespace)
                && command.trim_start().starts_with("show ")
        })
}
