//! Reconciliation engine and the resource module adapter.
//!
//! [`Reconciler`] owns the command list of one run and implements the
//! per-field comparison rule and context insertion. [`NetworkResource`] is
//! what each device resource implements; [`ResourceModule`] adapts any of
//! them to the [`Module`] trait (parameter validation, facts gathering,
//! state dispatch and result assembly).

use super::common::{get_from_dict, NetworkDeviceConnection, State};
use super::normalize::{list_to_dict, CollectionSpec};
use super::template::NetworkTemplate;
use crate::modules::{
    Diff, Module, ModuleContext, ModuleError, ModuleOutput, ModuleParams, ModuleResult, ParamExt,
};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

static EMPTY: Lazy<Value> = Lazy::new(|| Value::Object(Map::new()));

/// A shared empty tree, used wherever one side of a comparison is absent.
pub fn empty() -> &'static Value {
    &EMPTY
}

// ============================================================================
// Reconciler
// ============================================================================

/// Accumulates the ordered command list of one reconciliation pass.
#[derive(Debug)]
pub struct Reconciler<'t> {
    template: &'t NetworkTemplate,
    commands: Vec<String>,
}

impl<'t> Reconciler<'t> {
    pub fn new(template: &'t NetworkTemplate) -> Self {
        Self {
            template,
            commands: Vec::new(),
        }
    }

    /// Compare `want` and `have` for each named parser, in order.
    ///
    /// A set want that differs from have is rendered from want (a boolean
    /// want negates when `false`). An unset want with a set have is negated
    /// from have, except that a `false` have is rendered as-is.
    pub fn compare(&mut self, parsers: &[&str], want: &Value, have: &Value) -> ModuleResult<()> {
        for parser in parsers {
            let path = self.template.get_parser(parser)?.compare_path();
            let inw = get_from_dict(want, path);
            let inh = get_from_dict(have, path);
            match (inw, inh) {
                (Some(w), h) if Some(w) != h => match w {
                    Value::Bool(enabled) => self.addcmd(want, parser, !enabled)?,
                    _ => self.addcmd(want, parser, false)?,
                },
                (None, Some(h)) => match h {
                    Value::Bool(enabled) => self.addcmd(have, parser, *enabled)?,
                    _ => self.addcmd(have, parser, true)?,
                },
                _ => {}
            }
        }
        Ok(())
    }

    /// Render one command and append it unless it is empty.
    pub fn addcmd(&mut self, data: &Value, parser: &str, negate: bool) -> ModuleResult<()> {
        let command = self.template.render(data, parser, negate)?;
        if !command.is_empty() {
            self.commands.push(command);
        }
        Ok(())
    }

    /// Run a sub-scope and, if it produced commands, insert the context
    /// command rendered from `data` in front of them.
    pub fn scoped<F>(&mut self, data: &Value, parser: &str, f: F) -> ModuleResult<()>
    where
        F: FnOnce(&mut Self) -> ModuleResult<()>,
    {
        let begin = self.commands.len();
        f(self)?;
        if self.commands.len() > begin {
            let context = self.template.render(data, parser, false)?;
            if context.is_empty() {
                return Err(ModuleError::InvalidParameter(format!(
                    "'{}' produced no context command for {}",
                    parser, data
                )));
            }
            self.commands.insert(begin, context);
        }
        Ok(())
    }

    pub fn into_commands(self) -> Vec<String> {
        self.commands
    }
}

/// Entries of a want collection paired with their have counterpart, plus the
/// have entries no want entry claimed.
#[derive(Debug)]
pub struct EntryPairs<'a> {
    /// `(identity, want, have)`; have is [`empty`] when absent
    pub matched: Vec<(&'a str, &'a Value, &'a Value)>,
    /// Have-only entries in have order
    pub leftovers: Vec<(&'a str, &'a Value)>,
}

/// Pair two identity-keyed collections without mutating either.
///
/// Want order drives `matched`; non-object collections read as empty.
pub fn pair_entries<'a>(want: &'a Value, have: &'a Value) -> EntryPairs<'a> {
    let want_map = want.as_object();
    let have_map = have.as_object();

    let matched = want_map
        .into_iter()
        .flatten()
        .map(|(key, entry)| {
            let counterpart = have_map.and_then(|h| h.get(key)).unwrap_or(empty());
            (key.as_str(), entry, counterpart)
        })
        .collect();

    let leftovers = have_map
        .into_iter()
        .flatten()
        .filter(|(key, _)| !want_map.is_some_and(|w| w.contains_key(*key)))
        .map(|(key, entry)| (key.as_str(), entry))
        .collect();

    EntryPairs { matched, leftovers }
}

/// The collection at `path` in `tree` (the tree itself for an empty path),
/// or [`empty`].
pub fn collection<'a>(tree: &'a Value, path: &str) -> &'a Value {
    if path.is_empty() {
        return tree;
    }
    get_from_dict(tree, path).unwrap_or(empty())
}

// ============================================================================
// Network Resource
// ============================================================================

/// One configurable device resource (interfaces, BGP global, ...).
///
/// Trees handed to [`NetworkResource::generate_commands`] are validated and
/// normalized: every collection declared by
/// [`NetworkResource::collections`] is identity-keyed.
pub trait NetworkResource: Send + Sync {
    /// Resource name as used in facts (`bgp_global`)
    fn name(&self) -> &'static str;

    /// Module name as registered (`iosxr_bgp_global`)
    fn module_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// The show command whose output holds this resource
    fn gather_command(&self) -> &'static str;

    fn template(&self) -> &'static NetworkTemplate;

    fn collections(&self) -> &'static [CollectionSpec];

    fn supported_states(&self) -> &'static [State] {
        &State::ALL
    }

    /// Type-check a caller-form tree and return it with empties removed.
    fn validate_config(&self, config: &Value) -> ModuleResult<Value>;

    /// Turn the raw parser output into caller-form facts.
    fn facts_from_parsed(&self, parsed: Map<String, Value>) -> Value;

    /// Facts of a device with nothing configured for this resource
    fn empty_facts(&self) -> Value {
        Value::Object(Map::new())
    }

    /// Parse device text into validated caller-form facts.
    fn parse_facts(&self, text: &str) -> ModuleResult<Value> {
        let parsed = self.template().parse(text);
        if parsed.is_empty() {
            return Ok(self.empty_facts());
        }
        self.validate_config(&self.facts_from_parsed(parsed))
    }

    /// Compute the ordered command list moving `have` to `want`.
    fn generate_commands(&self, want: &Value, have: &Value, state: State)
        -> ModuleResult<Vec<String>>;
}

// ============================================================================
// Module Parameters
// ============================================================================

/// Parameters common to every resource module.
#[derive(Debug, Clone)]
pub struct ResourceParams {
    pub config: Option<Value>,
    pub running_config: Option<String>,
    pub state: State,
}

impl ResourceParams {
    pub fn from_params(params: &ModuleParams) -> ModuleResult<Self> {
        let config = params.get("config").filter(|v| !v.is_null()).cloned();
        let running_config = params.get_string("running_config")?;
        let state = match params.get_string("state")? {
            Some(s) => s.parse()?,
            None => State::default(),
        };
        Ok(Self {
            config,
            running_config,
            state,
        })
    }

    /// Mutual exclusion and required-if checks for the chosen state.
    pub fn validate(&self, resource: &dyn NetworkResource) -> ModuleResult<()> {
        if !resource.supported_states().contains(&self.state) {
            return Err(ModuleError::InvalidParameter(format!(
                "state '{}' is not supported by {}",
                self.state,
                resource.module_name()
            )));
        }
        if self.config.is_some() && self.running_config.is_some() {
            return Err(ModuleError::InvalidParameter(
                "parameters are mutually exclusive: config|running_config".to_string(),
            ));
        }
        if self.state.requires_config() && self.config.is_none() {
            return Err(ModuleError::MissingParameter(format!(
                "state is {} but all of the following are missing: config",
                self.state
            )));
        }
        if self.state == State::Parsed && self.running_config.is_none() {
            return Err(ModuleError::MissingParameter(
                "state is parsed but all of the following are missing: running_config".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Resource Module
// ============================================================================

/// Adapts a [`NetworkResource`] to the [`Module`] trait.
#[derive(Clone)]
pub struct ResourceModule {
    resource: Arc<dyn NetworkResource>,
}

impl std::fmt::Debug for ResourceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceModule")
            .field("resource", &self.resource.name())
            .finish()
    }
}

impl ResourceModule {
    pub fn new(resource: Arc<dyn NetworkResource>) -> Self {
        Self { resource }
    }

    fn connection<'c>(
        &self,
        state: State,
        context: &'c ModuleContext,
    ) -> ModuleResult<&'c Arc<dyn NetworkDeviceConnection>> {
        context.connection.as_ref().ok_or_else(|| {
            ModuleError::ExecutionFailed(format!(
                "{} with state {} requires a device connection",
                self.resource.module_name(),
                state
            ))
        })
    }

    /// Validate and normalize the caller's tree.
    fn want(&self, config: Option<&Value>) -> ModuleResult<Value> {
        let config = match config {
            Some(config) => self.resource.validate_config(config)?,
            None => self.resource.empty_facts(),
        };
        list_to_dict(&config, self.resource.collections())
    }

    fn gather(&self, connection: &dyn NetworkDeviceConnection) -> ModuleResult<Value> {
        let text = connection.get(self.resource.gather_command())?;
        self.resource.parse_facts(&text)
    }
}

impl Module for ResourceModule {
    fn name(&self) -> &'static str {
        self.resource.module_name()
    }

    fn description(&self) -> &'static str {
        self.resource.description()
    }

    fn states(&self) -> Vec<&'static str> {
        self.resource
            .supported_states()
            .iter()
            .map(State::as_str)
            .collect()
    }

    fn validate_params(&self, params: &ModuleParams) -> ModuleResult<()> {
        ResourceParams::from_params(params)?.validate(self.resource.as_ref())
    }

    fn execute(&self, params: &ModuleParams, context: &ModuleContext) -> ModuleResult<ModuleOutput> {
        let params = ResourceParams::from_params(params)?;
        params.validate(self.resource.as_ref())?;
        let state = params.state;
        let name = self.resource.module_name();

        match state {
            State::Parsed => {
                let text = params.running_config.as_deref().unwrap_or_default();
                let facts = self.resource.parse_facts(text)?;
                return Ok(ModuleOutput::ok(format!("{}: parsed running_config", name))
                    .with_data("parsed", facts));
            }
            State::Gathered => {
                let connection = self.connection(state, context)?;
                let facts = self.gather(connection.as_ref())?;
                return Ok(ModuleOutput::ok(format!(
                    "{}: gathered facts from {}",
                    name,
                    connection.identifier()
                ))
                .with_data("gathered", facts));
            }
            State::Rendered => {
                let want = self.want(params.config.as_ref())?;
                let commands = self.resource.generate_commands(&want, empty(), state)?;
                debug!(module = name, count = commands.len(), "rendered commands");
                return Ok(ModuleOutput::ok(format!("{}: rendered {} command(s)", name, commands.len()))
                    .with_data("rendered", json!(commands)));
            }
            _ => {}
        }

        let want = self.want(params.config.as_ref())?;
        let connection = self.connection(state, context)?;
        let before = self.gather(connection.as_ref())?;
        let have = list_to_dict(&before, self.resource.collections())?;

        let commands = self.resource.generate_commands(&want, &have, state)?;
        debug!(module = name, %state, count = commands.len(), "reconciled");

        if commands.is_empty() {
            return Ok(ModuleOutput::ok(format!("{}: no changes needed", name))
                .with_data("commands", json!(commands))
                .with_data("before", before));
        }

        let mut output = if context.check_mode {
            ModuleOutput::changed(format!(
                "{}: would apply {} command(s)",
                name,
                commands.len()
            ))
        } else {
            connection.edit_config(&commands)?;
            info!(module = name, device = %connection.identifier(), "applied {} command(s)", commands.len());
            let after = self.gather(connection.as_ref())?;
            ModuleOutput::changed(format!("{}: applied {} command(s)", name, commands.len()))
                .with_data("after", after)
        };

        if context.diff_mode {
            output = output.with_diff(
                Diff::new(
                    serde_json::to_string_pretty(&before).unwrap_or_default(),
                    format!("{} command(s)", commands.len()),
                )
                .with_details(commands.join("\n")),
            );
        }

        Ok(output
            .with_data("commands", json!(commands))
            .with_data("before", before))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::network::template::{ParserRule, Setval};
    use pretty_assertions::assert_eq;

    fn template() -> NetworkTemplate {
        NetworkTemplate::new(vec![
            ParserRule::new(
                "neighbor",
                r"^\s+neighbor\s(?P<neighbor>\S+)$",
                Setval::Template("neighbor {{ neighbor }}"),
            )
            .shared(),
            ParserRule::new(
                "remote_as",
                r"^\s+remote-as\s(?P<remote_as>\S+)$",
                Setval::Template("remote-as {{ remote_as }}"),
            ),
            ParserRule::new("shutdown", r"^\s+shutdown$", Setval::Template("shutdown")),
            ParserRule::new(
                "timers",
                r"^\s+timers\s(?P<k>\d+)\s(?P<h>\d+)$",
                Setval::Template("timers {{ timers.keepalive }} {{ timers.holdtime }}"),
            ),
        ])
    }

    #[test]
    fn test_compare_emits_want_on_difference() {
        let tmplt = template();
        let mut rec = Reconciler::new(&tmplt);
        rec.compare(
            &["remote_as", "shutdown"],
            &json!({"remote_as": "65002", "shutdown": true}),
            &json!({"remote_as": "65001", "shutdown": true}),
        )
        .unwrap();
        assert_eq!(rec.into_commands(), vec!["remote-as 65002"]);
    }

    #[test]
    fn test_compare_negates_removed_fields() {
        let tmplt = template();
        let mut rec = Reconciler::new(&tmplt);
        rec.compare(
            &["remote_as", "shutdown", "timers"],
            &json!({}),
            &json!({"remote_as": "1", "shutdown": true, "timers": {"keepalive": 10, "holdtime": 30}}),
        )
        .unwrap();
        assert_eq!(
            rec.into_commands(),
            vec!["no remote-as 1", "no shutdown", "no timers 10 30"]
        );
    }

    #[test]
    fn test_compare_bool_want() {
        let tmplt = template();
        let mut rec = Reconciler::new(&tmplt);
        rec.compare(&["shutdown"], &json!({"shutdown": false}), &json!({"shutdown": true}))
            .unwrap();
        assert_eq!(rec.into_commands(), vec!["no shutdown"]);
    }

    #[test]
    fn test_compare_equal_is_silent() {
        let tmplt = template();
        let mut rec = Reconciler::new(&tmplt);
        let tree = json!({"remote_as": "1", "timers": {"keepalive": 10, "holdtime": 30}});
        rec.compare(&["remote_as", "timers"], &tree, &tree).unwrap();
        assert!(rec.into_commands().is_empty());
    }

    #[test]
    fn test_scoped_inserts_context_only_when_needed() {
        let tmplt = template();
        let mut rec = Reconciler::new(&tmplt);
        let entry = json!({"neighbor": "10.0.0.1", "remote_as": "2"});
        rec.scoped(&entry, "neighbor", |r| r.compare(&["remote_as"], &entry, &entry))
            .unwrap();
        assert!(rec.into_commands().is_empty());

        let mut rec = Reconciler::new(&tmplt);
        rec.scoped(&entry, "neighbor", |r| r.compare(&["remote_as"], &entry, empty()))
            .unwrap();
        assert_eq!(rec.into_commands(), vec!["neighbor 10.0.0.1", "remote-as 2"]);
    }

    #[test]
    fn test_scoped_empty_context_is_error() {
        let tmplt = template();
        let mut rec = Reconciler::new(&tmplt);
        let entry = json!({"remote_as": "2"});
        let err = rec
            .scoped(&entry, "neighbor", |r| r.compare(&["remote_as"], &entry, empty()))
            .unwrap_err();
        assert!(matches!(err, ModuleError::InvalidParameter(_)));
    }

    #[test]
    fn test_pair_entries() {
        let want = json!({"b": {"x": 1}, "a": {"x": 2}});
        let have = json!({"c": {"x": 3}, "a": {"x": 4}});
        let pairs = pair_entries(&want, &have);
        let matched: Vec<(&str, &Value, &Value)> = pairs.matched;
        assert_eq!(matched[0], ("b", &json!({"x": 1}), empty()));
        assert_eq!(matched[1], ("a", &json!({"x": 2}), &json!({"x": 4})));
        assert_eq!(pairs.leftovers, vec![("c", &json!({"x": 3}))]);
        // inputs are untouched
        assert_eq!(have.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_params_validation() {
        let mut params = ModuleParams::new();
        params.insert("state".to_string(), json!("parsed"));
        let parsed = ResourceParams::from_params(&params).unwrap();
        assert_eq!(parsed.state, State::Parsed);
        assert!(parsed.running_config.is_none());

        params.insert("state".to_string(), json!("bogus"));
        assert!(ResourceParams::from_params(&params).is_err());
    }
}
