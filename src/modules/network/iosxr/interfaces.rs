//! iosxr_interfaces: interface description, admin state, MTU, speed and duplex.

use super::validate_typed;
use crate::modules::network::common::{dict_merge, State};
use crate::modules::network::normalize::{dict_to_list, CollectionSpec, Identity};
use crate::modules::network::resource::{pair_entries, NetworkResource, Reconciler};
use crate::modules::network::template::{NetworkTemplate, ParserRule, Setval};
use crate::modules::ModuleResult;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Interface duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duplex {
    Full,
    Half,
}

/// One interface as the caller describes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub mtu: Option<u32>,
    pub speed: Option<u32>,
    pub duplex: Option<Duplex>,
}

fn render_enabled(data: &Value) -> Option<String> {
    match data.get("enabled")? {
        Value::Bool(true) => Some("no shutdown".to_string()),
        Value::Bool(false) => Some("shutdown".to_string()),
        _ => None,
    }
}

static TEMPLATE: Lazy<NetworkTemplate> = Lazy::new(|| {
    NetworkTemplate::new(vec![
        ParserRule::new(
            "name",
            r"^interface\s(?:preconfigure\s)?(?P<name>\S+)$",
            Setval::Template("interface {{ name }}"),
        )
        .result(json!({"{{ name }}": {"name": "{{ name }}"}}))
        .shared(),
        ParserRule::new(
            "description",
            r"^\s+description\s(?P<description>.+)$",
            Setval::Template("description {{ description }}"),
        )
        .remval(Setval::Template("description"))
        .result(json!({"{{ name }}": {"description": "{{ description }}"}}))
        .scope(&["name"]),
        ParserRule::new(
            "enabled",
            r"^\s+(?P<negated>no\s)?shutdown$",
            Setval::Func(render_enabled),
        )
        .result(json!({"{{ name }}": {"enabled": "{{ negated is defined }}"}}))
        .scope(&["name"]),
        ParserRule::new(
            "mtu",
            r"^\s+mtu\s(?P<mtu>\d+)$",
            Setval::Template("mtu {{ mtu }}"),
        )
        .remval(Setval::Template("mtu"))
        .result(json!({"{{ name }}": {"mtu": "{{ mtu|int }}"}}))
        .scope(&["name"]),
        ParserRule::new(
            "speed",
            r"^\s+speed\s(?P<speed>\d+)$",
            Setval::Template("speed {{ speed }}"),
        )
        .remval(Setval::Template("speed"))
        .result(json!({"{{ name }}": {"speed": "{{ speed|int }}"}}))
        .scope(&["name"]),
        ParserRule::new(
            "duplex",
            r"^\s+duplex\s(?P<duplex>full|half)$",
            Setval::Template("duplex {{ duplex }}"),
        )
        .remval(Setval::Template("duplex"))
        .result(json!({"{{ name }}": {"duplex": "{{ duplex }}"}}))
        .scope(&["name"]),
    ])
});

const COLLECTIONS: &[CollectionSpec] = &[CollectionSpec::new("", Identity::Field("name"))];

const PARSERS: &[&str] = &["description", "mtu", "speed", "duplex"];

/// The interfaces resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interfaces;

impl Interfaces {
    /// Fill in the device defaults an interface has when nothing is said.
    fn with_defaults(entry: &Value) -> Value {
        let mut entry = entry.clone();
        if let Value::Object(map) = &mut entry {
            map.entry("enabled").or_insert(Value::Bool(true));
        }
        entry
    }

    /// The state an interface is reset to: only its name and the defaults.
    fn reset(name: &str) -> Value {
        json!({"name": name, "enabled": true})
    }

    fn compare_interface(rec: &mut Reconciler<'_>, want: &Value, have: &Value) -> ModuleResult<()> {
        rec.scoped(want, "name", |rec| {
            rec.compare(PARSERS, want, have)?;
            let w = want.get("enabled").filter(|v| v.is_boolean());
            let h = have.get("enabled").filter(|v| v.is_boolean());
            if let Some(w) = w {
                if Some(w) != h {
                    rec.addcmd(&json!({"enabled": w}), "enabled", false)?;
                }
            }
            Ok(())
        })
    }
}

impl NetworkResource for Interfaces {
    fn name(&self) -> &'static str {
        "interfaces"
    }

    fn module_name(&self) -> &'static str {
        "iosxr_interfaces"
    }

    fn description(&self) -> &'static str {
        "Manage interface attributes on Cisco IOS-XR devices"
    }

    fn gather_command(&self) -> &'static str {
        "show running-config interface"
    }

    fn template(&self) -> &'static NetworkTemplate {
        &TEMPLATE
    }

    fn collections(&self) -> &'static [CollectionSpec] {
        COLLECTIONS
    }

    fn validate_config(&self, config: &Value) -> ModuleResult<Value> {
        validate_typed::<Vec<InterfaceConfig>>(self.module_name(), config)
    }

    fn facts_from_parsed(&self, parsed: Map<String, Value>) -> Value {
        dict_to_list(&Value::Object(parsed), COLLECTIONS)
    }

    fn empty_facts(&self) -> Value {
        Value::Array(Vec::new())
    }

    fn generate_commands(&self, want: &Value, have: &Value, state: State) -> ModuleResult<Vec<String>> {
        let mut rec = Reconciler::new(&TEMPLATE);
        let have: Map<String, Value> = have
            .as_object()
            .into_iter()
            .flatten()
            .map(|(name, entry)| (name.clone(), Self::with_defaults(entry)))
            .collect();
        let have = Value::Object(have);
        let pairs = pair_entries(want, &have);

        match state {
            State::Deleted | State::Purged => {
                let targets: Vec<(&str, &Value)> = if want.as_object().is_some_and(|w| !w.is_empty()) {
                    pairs
                        .matched
                        .iter()
                        .filter_map(|(name, _, _)| have.get(*name).map(|h| (*name, h)))
                        .collect()
                } else {
                    pairs.leftovers.clone()
                };
                for (name, have_entry) in targets {
                    if state == State::Purged {
                        rec.addcmd(have_entry, "name", true)?;
                    } else {
                        Self::compare_interface(&mut rec, &Self::reset(name), have_entry)?;
                    }
                }
            }
            State::Merged | State::Rendered => {
                for (_, want_entry, have_entry) in &pairs.matched {
                    let merged = dict_merge(have_entry, want_entry);
                    Self::compare_interface(&mut rec, &merged, have_entry)?;
                }
            }
            State::Replaced | State::Overridden => {
                for (_, want_entry, have_entry) in &pairs.matched {
                    Self::compare_interface(&mut rec, &Self::with_defaults(want_entry), have_entry)?;
                }
                if state == State::Overridden {
                    for (name, have_entry) in &pairs.leftovers {
                        Self::compare_interface(&mut rec, &Self::reset(name), have_entry)?;
                    }
                }
            }
            State::Parsed | State::Gathered => {}
        }

        Ok(rec.into_commands())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::network::normalize::list_to_dict;
    use crate::modules::network::resource::empty;
    use pretty_assertions::assert_eq;

    const RUNNING: &str = "\
interface Loopback0
 description router id
!
interface GigabitEthernet0/0/0/0
 description uplink
 mtu 9000
 speed 1000
 duplex full
!
interface GigabitEthernet0/0/0/1
 shutdown
!
";

    fn have() -> Value {
        let facts = Interfaces.parse_facts(RUNNING).unwrap();
        list_to_dict(&facts, COLLECTIONS).unwrap()
    }

    fn want(config: Value) -> Value {
        let config = Interfaces.validate_config(&config).unwrap();
        list_to_dict(&config, COLLECTIONS).unwrap()
    }

    #[test]
    fn test_parse_facts() {
        let facts = Interfaces.parse_facts(RUNNING).unwrap();
        assert_eq!(
            facts,
            json!([
                {"name": "Loopback0", "description": "router id"},
                {"name": "GigabitEthernet0/0/0/0", "description": "uplink", "mtu": 9000, "speed": 1000, "duplex": "full"},
                {"name": "GigabitEthernet0/0/0/1", "enabled": false}
            ])
        );
    }

    #[test]
    fn test_merged() {
        let commands = Interfaces
            .generate_commands(
                &want(json!([{"name": "GigabitEthernet0/0/0/1", "enabled": true, "mtu": 1500}])),
                &have(),
                State::Merged,
            )
            .unwrap();
        assert_eq!(
            commands,
            vec!["interface GigabitEthernet0/0/0/1", "mtu 1500", "no shutdown"]
        );
    }

    #[test]
    fn test_merged_is_idempotent() {
        let facts = Interfaces.parse_facts(RUNNING).unwrap();
        for state in [State::Merged, State::Replaced, State::Overridden] {
            let commands = Interfaces
                .generate_commands(&want(facts.clone()), &have(), state)
                .unwrap();
            assert!(commands.is_empty(), "{} produced {:?}", state, commands);
        }
    }

    #[test]
    fn test_replaced_negates_unlisted_fields() {
        let commands = Interfaces
            .generate_commands(
                &want(json!([{"name": "GigabitEthernet0/0/0/0", "mtu": 9000}])),
                &have(),
                State::Replaced,
            )
            .unwrap();
        assert_eq!(
            commands,
            vec!["interface GigabitEthernet0/0/0/0", "no description", "no speed", "no duplex"]
        );
    }

    #[test]
    fn test_overridden_resets_other_interfaces() {
        let commands = Interfaces
            .generate_commands(
                &want(json!([{"name": "Loopback0", "description": "router id"}])),
                &have(),
                State::Overridden,
            )
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet0/0/0/0",
                "no description",
                "no mtu",
                "no speed",
                "no duplex",
                "interface GigabitEthernet0/0/0/1",
                "no shutdown"
            ]
        );
    }

    #[test]
    fn test_deleted_all() {
        let commands = Interfaces
            .generate_commands(&json!({}), &have(), State::Deleted)
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface Loopback0",
                "no description",
                "interface GigabitEthernet0/0/0/0",
                "no description",
                "no mtu",
                "no speed",
                "no duplex",
                "interface GigabitEthernet0/0/0/1",
                "no shutdown"
            ]
        );
    }

    #[test]
    fn test_purged_listed() {
        let commands = Interfaces
            .generate_commands(
                &want(json!([{"name": "Loopback0"}, {"name": "Loopback99"}])),
                &have(),
                State::Purged,
            )
            .unwrap();
        assert_eq!(commands, vec!["no interface Loopback0"]);
    }

    #[test]
    fn test_rendered() {
        let commands = Interfaces
            .generate_commands(
                &want(json!([{"name": "GigabitEthernet0/0/0/3", "description": "new", "enabled": false}])),
                empty(),
                State::Rendered,
            )
            .unwrap();
        assert_eq!(
            commands,
            vec!["interface GigabitEthernet0/0/0/3", "description new", "shutdown"]
        );
    }

    #[test]
    fn test_invalid_config() {
        assert!(Interfaces
            .validate_config(&json!([{"name": "Gi0", "duplex": "auto"}]))
            .is_err());
        assert!(Interfaces
            .validate_config(&json!([{"name": "Gi0", "vlan": 10}]))
            .is_err());
    }

    #[test]
    fn test_every_rule_round_trips() {
        let samples = [
            ("description", "description to core router"),
            ("enabled", "shutdown"),
            ("enabled", "no shutdown"),
            ("mtu", "mtu 9216"),
            ("speed", "speed 10000"),
            ("duplex", "duplex half"),
        ];
        for rule in TEMPLATE.parsers().iter().filter(|rule| !rule.shared) {
            assert!(
                samples.iter().any(|(name, _)| *name == rule.name),
                "no sample line for rule '{}'",
                rule.name
            );
        }

        for (rule, line) in samples {
            let text = format!("interface GigabitEthernet0/0/0/3\n {}\n!\n", line);
            let parsed = Value::Object(TEMPLATE.parse(&text));
            let entry = &parsed["GigabitEthernet0/0/0/3"];

            let rendered = TEMPLATE.render(entry, rule, false).unwrap();
            assert_eq!(rendered, line, "rule '{}'", rule);
            assert_eq!(
                TEMPLATE.render(entry, "name", false).unwrap(),
                "interface GigabitEthernet0/0/0/3"
            );
            let again = format!("interface GigabitEthernet0/0/0/3\n {}\n!\n", rendered);
            assert_eq!(Value::Object(TEMPLATE.parse(&again)), parsed);
        }
    }
}
