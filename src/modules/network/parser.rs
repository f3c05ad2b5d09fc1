//! Text parser: device CLI text to a structured configuration tree.
//!
//! Lines are matched against the rule table in declaration order. Identity
//! context comes from shared rules and follows the CLI block structure:
//! every line closes the blocks opened at the same or a deeper indentation,
//! and only a shared-rule match opens a block whose captures later nested
//! lines can see. Any other line opens an opaque block, so its children are
//! never mistaken for children of an outer identity.

use super::common::dict_merge;
use super::template::NetworkTemplate;
use serde_json::{Map, Value};
use tracing::trace;

/// One open CLI block.
#[derive(Debug)]
struct Scope {
    indent: usize,
    /// The shared rule that opened the block; `None` for opaque blocks
    rule: Option<&'static str>,
    captures: Map<String, Value>,
}

impl NetworkTemplate {
    /// Parse device output into a tree keyed by the identities the rules'
    /// result shapes declare.
    ///
    /// Unmatched lines are skipped. A rule that matches outside any identity
    /// context renders with undefined keys and merges nothing.
    pub fn parse(&self, text: &str) -> Map<String, Value> {
        let mut result = Value::Object(Map::new());
        let mut stack: Vec<Scope> = Vec::new();

        for line in text.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            while stack.last().is_some_and(|scope| scope.indent >= indent) {
                stack.pop();
            }
            let context = stack.last().and_then(|scope| scope.rule);

            let matched = self.parsers().iter().find_map(|rule| {
                if !rule.applies_in(context) {
                    return None;
                }
                rule.getval.captures(line).map(|caps| (rule, caps))
            });

            let Some((rule, caps)) = matched else {
                trace!("no rule matched line: {:?}", line);
                stack.push(Scope {
                    indent,
                    rule: None,
                    captures: Map::new(),
                });
                continue;
            };

            let mut captures = Map::new();
            for group in rule.getval.capture_names().flatten() {
                if let Some(m) = caps.name(group) {
                    captures.insert(group.to_string(), Value::String(m.as_str().to_string()));
                }
            }

            let mut vars = Map::new();
            for scope in &stack {
                for (key, value) in &scope.captures {
                    vars.insert(key.clone(), value.clone());
                }
            }
            for (key, value) in &captures {
                vars.insert(key.clone(), value.clone());
            }

            if let Some(shaped) = self.shape(&rule.result, &Value::Object(vars)) {
                result = dict_merge(&result, &shaped);
            }

            stack.push(Scope {
                indent,
                rule: rule.shared.then_some(rule.name),
                captures: if rule.shared { captures } else { Map::new() },
            });
        }

        match result {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}
