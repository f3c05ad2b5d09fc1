//! iosxr_bgp_global: the BGP router, its neighbors, VRFs and RPKI servers.

mod argspec;
mod rules;

pub use argspec::*;

use super::validate_typed;
use crate::modules::network::common::{dict_merge, is_empty_value, State};
use crate::modules::network::normalize::{dict_to_list, CollectionSpec, Identity};
use crate::modules::network::resource::{
    collection, empty, pair_entries, NetworkResource, Reconciler,
};
use crate::modules::network::template::NetworkTemplate;
use crate::modules::{ModuleError, ModuleResult};
use rules::{
    GLOBAL_VRF_KEY, NEIGHBOR_PARSERS, ROUTER_PARSERS, RPKI_SERVER_PARSERS, TEMPLATE, VRF_PARSERS,
};
use serde_json::{Map, Value};
use tracing::debug;

const NEIGHBORS: CollectionSpec = CollectionSpec::new("neighbors", Identity::Field("neighbor"));
const VRF_CHILDREN: &[CollectionSpec] = &[NEIGHBORS];

const COLLECTIONS: &[CollectionSpec] = &[
    CollectionSpec::new("rpki.servers", Identity::Field("name")),
    NEIGHBORS,
    CollectionSpec::new("vrfs", Identity::Field("vrf")).with_children(VRF_CHILDREN),
];

/// The BGP global resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct BgpGlobal;

impl BgpGlobal {
    /// Compare one BGP instance inside its `router bgp` context.
    fn compare_root(rec: &mut Reconciler<'_>, want: &Value, have: &Value) -> ModuleResult<()> {
        rec.scoped(want, "router", |rec| {
            Self::compare_rpki_servers(rec, want, have)?;
            Self::compare_neighbors(rec, want, have)?;
            Self::compare_vrfs(rec, want, have)?;
            rec.compare(ROUTER_PARSERS.as_slice(), want, have)
        })
    }

    fn compare_rpki_servers(rec: &mut Reconciler<'_>, want: &Value, have: &Value) -> ModuleResult<()> {
        let pairs = pair_entries(
            collection(want, "rpki.servers"),
            collection(have, "rpki.servers"),
        );
        for (_, want_entry, have_entry) in &pairs.matched {
            rec.scoped(want_entry, "rpki_server", |rec| {
                rec.compare(RPKI_SERVER_PARSERS.as_slice(), want_entry, have_entry)
            })?;
        }
        for (_, have_entry) in &pairs.leftovers {
            rec.addcmd(have_entry, "rpki_server", true)?;
        }
        Ok(())
    }

    fn compare_neighbors(rec: &mut Reconciler<'_>, want: &Value, have: &Value) -> ModuleResult<()> {
        let pairs = pair_entries(collection(want, "neighbors"), collection(have, "neighbors"));
        for (_, want_entry, have_entry) in &pairs.matched {
            rec.scoped(want_entry, "neighbor", |rec| {
                rec.compare(NEIGHBOR_PARSERS.as_slice(), want_entry, have_entry)
            })?;
        }
        for (_, have_entry) in &pairs.leftovers {
            rec.addcmd(have_entry, "neighbor", true)?;
        }
        Ok(())
    }

    fn compare_vrfs(rec: &mut Reconciler<'_>, want: &Value, have: &Value) -> ModuleResult<()> {
        let pairs = pair_entries(collection(want, "vrfs"), collection(have, "vrfs"));
        for (_, want_entry, have_entry) in &pairs.matched {
            rec.scoped(want_entry, "vrf", |rec| {
                Self::compare_neighbors(rec, want_entry, have_entry)?;
                rec.compare(VRF_PARSERS.as_slice(), want_entry, have_entry)
            })?;
        }
        for (_, have_entry) in &pairs.leftovers {
            rec.addcmd(have_entry, "vrf", true)?;
        }
        Ok(())
    }
}

impl NetworkResource for BgpGlobal {
    fn name(&self) -> &'static str {
        "bgp_global"
    }

    fn module_name(&self) -> &'static str {
        "iosxr_bgp_global"
    }

    fn description(&self) -> &'static str {
        "Manage global BGP configuration on Cisco IOS-XR devices"
    }

    fn gather_command(&self) -> &'static str {
        "show running-config router bgp"
    }

    fn template(&self) -> &'static NetworkTemplate {
        &TEMPLATE
    }

    fn collections(&self) -> &'static [CollectionSpec] {
        COLLECTIONS
    }

    fn validate_config(&self, config: &Value) -> ModuleResult<Value> {
        let validated = validate_typed::<BgpGlobalConfig>(self.module_name(), config)?;
        let typed: BgpGlobalConfig = serde_json::from_value(validated.clone())
            .map_err(|e| ModuleError::ExecutionFailed(format!("{}: {}", self.module_name(), e)))?;
        if let Some(path) = typed.incomplete_timers() {
            return Err(ModuleError::MissingParameter(format!(
                "{}: {} is required when timers are set",
                self.module_name(),
                path
            )));
        }
        Ok(validated)
    }

    /// Router-level fields are parsed into the unnamed VRF slot; lift them
    /// back to the root before presenting the facts.
    fn facts_from_parsed(&self, mut parsed: Map<String, Value>) -> Value {
        let global = match parsed.get_mut("vrfs") {
            Some(Value::Object(vrfs)) => vrfs.shift_remove(GLOBAL_VRF_KEY),
            _ => None,
        };
        if parsed.get("vrfs").is_some_and(is_empty_value) {
            parsed.shift_remove("vrfs");
        }

        let mut tree = Value::Object(parsed);
        if let Some(global) = global {
            tree = dict_merge(&tree, &global);
        }
        dict_to_list(&tree, COLLECTIONS)
    }

    fn generate_commands(&self, want: &Value, have: &Value, state: State) -> ModuleResult<Vec<String>> {
        let mut rec = Reconciler::new(&TEMPLATE);
        let want_as = want.get("as_number");
        let have_as = have.get("as_number");

        if state.produces_commands() && !is_empty_value(want) && want_as.is_none() {
            return Err(ModuleError::MissingParameter(format!(
                "{}: config.as_number is required",
                self.module_name()
            )));
        }

        match state {
            State::Deleted | State::Purged => {
                if have_as.is_some() && (want_as.is_none() || want_as == have_as) {
                    rec.addcmd(have, "router", true)?;
                }
            }
            State::Merged => {
                if let (Some(w), Some(h)) = (want_as, have_as) {
                    if w != h {
                        return Err(ModuleError::InvalidParameter(format!(
                            "{}: BGP {} is configured; cannot merge into AS {}",
                            self.module_name(),
                            h,
                            w
                        )));
                    }
                }
                let merged = dict_merge(have, want);
                Self::compare_root(&mut rec, &merged, have)?;
            }
            State::Replaced | State::Overridden => {
                if have_as.is_some() && want_as != have_as {
                    debug!(?have_as, ?want_as, "replacing BGP instance");
                    rec.addcmd(have, "router", true)?;
                    Self::compare_root(&mut rec, want, empty())?;
                } else {
                    Self::compare_root(&mut rec, want, have)?;
                }
            }
            State::Rendered => Self::compare_root(&mut rec, want, empty())?,
            State::Parsed | State::Gathered => {}
        }

        Ok(rec.into_commands())
    }
}
