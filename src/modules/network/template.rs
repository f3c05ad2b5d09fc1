//! Declarative pattern rules shared by parsing and rendering.
//!
//! A [`NetworkTemplate`] is an ordered list of [`ParserRule`]s. Each rule owns
//! one line shape of the device CLI grammar and knows how to read it
//! (`getval` + `result`) and how to write it back (`setval` / `remval`).
//! The same table drives the text parser (see `parser.rs`) and the command
//! renderer, which keeps the two directions symmetric.

use crate::modules::{ModuleError, ModuleResult};
use minijinja::{Environment, UndefinedBehavior};
use regex::Regex;
use serde_json::{Map, Value};

/// How a rule turns entry data into command text.
#[derive(Clone, Copy)]
pub enum Setval {
    /// A minijinja template rendered against the entry data
    Template(&'static str),
    /// A render function for commands that need real logic
    Func(fn(&Value) -> Option<String>),
}

impl std::fmt::Debug for Setval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Setval::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Setval::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// One (matcher, result-shape, render) triple.
#[derive(Debug, Clone)]
pub struct ParserRule {
    pub name: &'static str,
    pub getval: Regex,
    pub setval: Setval,
    pub remval: Option<Setval>,
    pub compval: Option<&'static str>,
    pub result: Value,
    pub shared: bool,
    pub scope: &'static [&'static str],
}

impl ParserRule {
    /// Start a rule. Patterns are fixed at compile time, so an invalid one
    /// is a programming error and panics when the rule table is built.
    pub fn new(name: &'static str, getval: &str, setval: Setval) -> Self {
        let getval = Regex::new(getval)
            .unwrap_or_else(|e| panic!("invalid getval pattern for rule '{}': {}", name, e));
        Self {
            name,
            getval,
            setval,
            remval: None,
            compval: None,
            result: Value::Object(Map::new()),
            shared: false,
            scope: &[],
        }
    }

    /// Template used instead of `setval` when negating
    pub fn remval(mut self, remval: Setval) -> Self {
        self.remval = Some(remval);
        self
    }

    /// Dotted path compared between want and have (defaults to the name)
    pub fn compval(mut self, compval: &'static str) -> Self {
        self.compval = Some(compval);
        self
    }

    pub fn result(mut self, result: Value) -> Self {
        self.result = result;
        self
    }

    /// Mark this rule as opening an identity context
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    /// Restrict the rule to contexts opened by the named shared rules
    pub fn scope(mut self, scope: &'static [&'static str]) -> Self {
        self.scope = scope;
        self
    }

    /// The path compared for this rule
    pub fn compare_path(&self) -> &'static str {
        self.compval.unwrap_or(self.name)
    }

    /// Whether the rule applies inside the given innermost context.
    ///
    /// `None` is the root (no context) or a block no rule recognised.
    pub fn applies_in(&self, context: Option<&str>) -> bool {
        if self.scope.is_empty() {
            return true;
        }
        context.is_some_and(|ctx| self.scope.contains(&ctx))
    }
}

/// An ordered rule table plus the template environment that renders it.
pub struct NetworkTemplate {
    parsers: Vec<ParserRule>,
    env: Environment<'static>,
}

impl std::fmt::Debug for NetworkTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkTemplate")
            .field("parsers", &self.parsers.iter().map(|p| p.name).collect::<Vec<_>>())
            .finish()
    }
}

impl NetworkTemplate {
    pub fn new(parsers: Vec<ParserRule>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self {
            parsers,
            env,
        }
    }

    pub fn parsers(&self) -> &[ParserRule] {
        &self.parsers
    }

    pub fn get_parser(&self, name: &str) -> ModuleResult<&ParserRule> {
        self.parsers
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ModuleError::ParseError(format!("unknown parser '{}'", name)))
    }

    /// Render the command a rule produces for `data`.
    ///
    /// Undefined data renders nothing; an empty string means "no command".
    /// When negating, `remval` is preferred and `no` is prefixed.
    pub fn render(&self, data: &Value, parser: &str, negate: bool) -> ModuleResult<String> {
        let rule = self.get_parser(parser)?;
        let setval = if negate {
            rule.remval.unwrap_or(rule.setval)
        } else {
            rule.setval
        };

        let rendered = match setval {
            Setval::Func(func) => func(data).unwrap_or_default(),
            Setval::Template(tmplt) => self.render_str(tmplt, data).unwrap_or_default(),
        };
        let rendered = rendered.trim();

        if rendered.is_empty() {
            Ok(String::new())
        } else if negate {
            Ok(format!("no {}", rendered))
        } else {
            Ok(rendered.to_string())
        }
    }

    /// Render a template string, `None` when it references undefined data.
    pub(crate) fn render_str(&self, tmplt: &str, vars: &Value) -> Option<String> {
        match self.env.render_str(tmplt, vars) {
            Ok(rendered) => Some(rendered),
            Err(e) => {
                tracing::trace!("template '{}' rendered nothing: {}", tmplt, e);
                None
            }
        }
    }

    /// Evaluate a result-shape against captured variables.
    ///
    /// Keys and string leaves may be templates. A leaf made of one
    /// `{{ expr }}` keeps the type of the expression. Keys that render
    /// empty drop their whole subtree; leaves that evaluate to nothing are
    /// dropped.
    pub(crate) fn shape(&self, result: &Value, vars: &Value) -> Option<Value> {
        match result {
            Value::Object(map) => {
                let mut shaped = Map::new();
                for (key, value) in map {
                    let key = if key.contains("{{") {
                        match self.render_str(key, vars) {
                            Some(k) if !k.trim().is_empty() => k.trim().to_string(),
                            _ => continue,
                        }
                    } else {
                        key.clone()
                    };
                    if let Some(value) = self.shape(value, vars) {
                        shaped.insert(key, value);
                    }
                }
                Some(Value::Object(shaped))
            }
            Value::Array(items) => Some(Value::Array(
                items.iter().filter_map(|item| self.shape(item, vars)).collect(),
            )),
            Value::String(s) if s.contains("{{") || s.contains("{%") => self.shape_leaf(s, vars),
            other => Some(other.clone()),
        }
    }

    fn shape_leaf(&self, leaf: &str, vars: &Value) -> Option<Value> {
        if let Some(expr) = single_expression(leaf) {
            let value = self
                .env
                .compile_expression(expr)
                .and_then(|compiled| compiled.eval(vars))
                .ok()?;
            if value.is_undefined() || value.is_none() {
                return None;
            }
            return serde_json::to_value(&value).ok();
        }

        self.render_str(leaf, vars)
            .filter(|rendered| !rendered.is_empty())
            .map(Value::String)
    }
}

/// The inner expression of a leaf that is exactly one `{{ ... }}` block.
fn single_expression(leaf: &str) -> Option<&str> {
    let inner = leaf.trim().strip_prefix("{{")?.strip_suffix("}}")?;
    if inner.contains("{{") || inner.contains("}}") || inner.contains("{%") {
        return None;
    }
    Some(inner.trim())
}
