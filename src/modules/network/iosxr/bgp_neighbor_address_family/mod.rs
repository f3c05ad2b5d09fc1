//! iosxr_bgp_neighbor_address_family: per-neighbor address families.
//!
//! Neighbors themselves belong to `iosxr_bgp_global`; this resource only
//! ever adds, changes or removes `address-family` blocks inside them.

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
use rules::{AF_PARSERS, GLOBAL_VRF_KEY, TEMPLATE};
use serde_json::{Map, Value};

const ADDRESS_FAMILIES: CollectionSpec =
    CollectionSpec::new("address_family", Identity::Composite(&["afi", "safi"]));
const NEIGHBOR_CHILDREN: &[CollectionSpec] = &[ADDRESS_FAMILIES];
const NEIGHBORS: CollectionSpec =
    CollectionSpec::new("neighbors", Identity::Field("neighbor")).with_children(NEIGHBOR_CHILDREN);
const VRF_CHILDREN: &[CollectionSpec] = &[NEIGHBORS];

const COLLECTIONS: &[CollectionSpec] = &[
    NEIGHBORS,
    CollectionSpec::new("vrfs", Identity::Field("vrf")).with_children(VRF_CHILDREN),
];

const SUPPORTED_STATES: &[State] = &[
    State::Merged,
    State::Replaced,
    State::Overridden,
    State::Deleted,
    State::Rendered,
    State::Parsed,
    State::Gathered,
];

/// Drop neighbors without address families (and the collection if that
/// leaves it empty).
fn prune_neighbors(container: &mut Map<String, Value>) {
    if let Some(Value::Object(neighbors)) = container.get_mut("neighbors") {
        neighbors.retain(|_, neighbor| neighbor.get("address_family").is_some());
    }
    if container.get("neighbors").is_some_and(is_empty_value) {
        container.shift_remove("neighbors");
    }
}

/// The BGP neighbor address-family resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct BgpNeighborAddressFamily;

impl BgpNeighborAddressFamily {
    fn compare_root(
        rec: &mut Reconciler<'_>,
        context: &Value,
        want: &Value,
        have: &Value,
        clear_unlisted: bool,
    ) -> ModuleResult<()> {
        rec.scoped(context, "router", |rec| {
            Self::compare_neighbors(rec, want, have, clear_unlisted)?;

            let vrfs = pair_entries(collection(want, "vrfs"), collection(have, "vrfs"));
            for (_, want_vrf, have_vrf) in &vrfs.matched {
                rec.scoped(want_vrf, "vrf", |rec| {
                    Self::compare_neighbors(rec, want_vrf, have_vrf, clear_unlisted)
                })?;
            }
            if clear_unlisted {
                for (_, have_vrf) in &vrfs.leftovers {
                    rec.scoped(have_vrf, "vrf", |rec| {
                        Self::clear_neighbors(rec, None, collection(have_vrf, "neighbors"))
                    })?;
                }
            }
            Ok(())
        })
    }

    fn compare_neighbors(
        rec: &mut Reconciler<'_>,
        want: &Value,
        have: &Value,
        clear_unlisted: bool,
    ) -> ModuleResult<()> {
        let pairs = pair_entries(collection(want, "neighbors"), collection(have, "neighbors"));
        for (_, want_entry, have_entry) in &pairs.matched {
            rec.scoped(want_entry, "neighbor", |rec| {
                Self::compare_address_families(rec, want_entry, have_entry)
            })?;
        }
        if clear_unlisted {
            for (_, have_entry) in &pairs.leftovers {
                rec.scoped(have_entry, "neighbor", |rec| Self::clear_address_families(rec, have_entry))?;
            }
        }
        Ok(())
    }

    fn compare_address_families(rec: &mut Reconciler<'_>, want: &Value, have: &Value) -> ModuleResult<()> {
        let pairs = pair_entries(
            collection(want, "address_family"),
            collection(have, "address_family"),
        );
        for (_, want_af, have_af) in &pairs.matched {
            if is_empty_value(have_af) {
                // Enabling an address family is a change even with no options.
                rec.addcmd(want_af, "address_family", false)?;
                rec.compare(AF_PARSERS.as_slice(), want_af, have_af)?;
            } else {
                rec.scoped(want_af, "address_family", |rec| {
                    rec.compare(AF_PARSERS.as_slice(), want_af, have_af)
                })?;
            }
        }
        for (_, have_af) in &pairs.leftovers {
            rec.addcmd(have_af, "address_family", true)?;
        }
        Ok(())
    }

    fn clear_address_families(rec: &mut Reconciler<'_>, have: &Value) -> ModuleResult<()> {
        for (_, have_af) in collection(have, "address_family").as_object().into_iter().flatten() {
            rec.addcmd(have_af, "address_family", true)?;
        }
        Ok(())
    }

    /// Clear every address family of the `listed` neighbors, or of all of
    /// them when `listed` is `None`.
    fn clear_neighbors(
        rec: &mut Reconciler<'_>,
        listed: Option<&Value>,
        have_neighbors: &Value,
    ) -> ModuleResult<()> {
        for (name, have_entry) in have_neighbors.as_object().into_iter().flatten() {
            if listed.is_some_and(|listed| listed.get(name).is_none()) {
                continue;
            }
            rec.scoped(have_entry, "neighbor", |rec| Self::clear_address_families(rec, have_entry))?;
        }
        Ok(())
    }

    fn delete(rec: &mut Reconciler<'_>, want: &Value, have: &Value) -> ModuleResult<()> {
        let want_neighbors = want.get("neighbors");
        let want_vrfs = want.get("vrfs");
        let everything = want_neighbors.is_none() && want_vrfs.is_none();

        rec.scoped(have, "router", |rec| {
            if everything || want_neighbors.is_some() {
                Self::clear_neighbors(rec, want_neighbors, collection(have, "neighbors"))?;
            }
            for (name, have_vrf) in collection(have, "vrfs").as_object().into_iter().flatten() {
                let listed = match want_vrfs.and_then(|vrfs| vrfs.get(name)) {
                    Some(want_vrf) => want_vrf.get("neighbors"),
                    None if everything => None,
                    None => continue,
                };
                rec.scoped(have_vrf, "vrf", |rec| {
                    Self::clear_neighbors(rec, listed, collection(have_vrf, "neighbors"))
                })?;
            }
            Ok(())
        })
    }
}

impl NetworkResource for BgpNeighborAddressFamily {
    fn name(&self) -> &'static str {
        "bgp_neighbor_address_family"
    }

    fn module_name(&self) -> &'static str {
        "iosxr_bgp_neighbor_address_family"
    }

    fn description(&self) -> &'static str {
        "Manage BGP neighbor address families on Cisco IOS-XR devices"
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

    fn supported_states(&self) -> &'static [State] {
        SUPPORTED_STATES
    }

    fn validate_config(&self, config: &Value) -> ModuleResult<Value> {
        validate_typed::<BgpNeighborAddressFamilyConfig>(self.module_name(), config)
    }

    fn facts_from_parsed(&self, mut parsed: Map<String, Value>) -> Value {
        let mut global = None;
        if let Some(Value::Object(vrfs)) = parsed.get_mut("vrfs") {
            global = vrfs.shift_remove(GLOBAL_VRF_KEY);
            for vrf in vrfs.values_mut() {
                if let Value::Object(vrf) = vrf {
                    prune_neighbors(vrf);
                }
            }
            vrfs.retain(|_, vrf| vrf.get("neighbors").is_some());
        }
        if parsed.get("vrfs").is_some_and(is_empty_value) {
            parsed.shift_remove("vrfs");
        }

        let mut tree = Value::Object(parsed);
        if let Some(global) = global {
            tree = dict_merge(&tree, &global);
        }
        if let Value::Object(root) = &mut tree {
            prune_neighbors(root);
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
            State::Deleted => {
                if have_as.is_some() && (want_as.is_none() || want_as == have_as) {
                    Self::delete(&mut rec, want, have)?;
                }
            }
            State::Merged | State::Replaced | State::Overridden => {
                if let (Some(w), Some(h)) = (want_as, have_as) {
                    if w != h {
                        return Err(ModuleError::InvalidParameter(format!(
                            "{}: BGP {} is configured, not AS {}; change the instance with iosxr_bgp_global",
                            self.module_name(),
                            h,
                            w
                        )));
                    }
                }
                let context = if want_as.is_some() { want } else { have };
                if state == State::Merged {
                    let merged = dict_merge(have, want);
                    Self::compare_root(&mut rec, context, &merged, have, false)?;
                } else {
                    Self::compare_root(&mut rec, context, want, have, state == State::Overridden)?;
                }
            }
            State::Rendered => Self::compare_root(&mut rec, want, want, empty(), false)?,
            State::Purged => {
                return Err(ModuleError::Unsupported(format!(
                    "{} does not support state purged",
                    self.module_name()
                )))
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
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const RUNNING: &str = "\
router bgp 65000
 bgp router-id 192.0.2.1
 address-family ipv4 unicast
 !
 neighbor 10.0.0.1
  remote-as 65001
  address-family ipv4 unicast
   route-policy PASS in
   maximum-prefix 1000 80 warning-only
   next-hop-self
  !
  address-family ipv6 unicast
   allowas-in 3
  !
 !
 neighbor 10.0.0.2
  remote-as 65002
 !
 vrf blue
  rd auto
  neighbor 10.1.1.1
   remote-as 65100
   address-family ipv4 unicast
    send-community-ebgp
    weight 100
   !
  !
 !
!
";

    fn facts() -> Value {
        BgpNeighborAddressFamily.parse_facts(RUNNING).unwrap()
    }

    fn have() -> Value {
        list_to_dict(&facts(), COLLECTIONS).unwrap()
    }

    fn want(config: Value) -> Value {
        let config = BgpNeighborAddressFamily.validate_config(&config).unwrap();
        list_to_dict(&config, COLLECTIONS).unwrap()
    }

    fn generate(config: Value, state: State) -> Vec<String> {
        BgpNeighborAddressFamily
            .generate_commands(&want(config), &have(), state)
            .unwrap()
    }

    fn one_af_want() -> Value {
        json!({
            "as_number": "65000",
            "neighbors": [{
                "neighbor": "10.0.0.1",
                "address_family": [{"afi": "ipv4", "safi": "unicast", "route_policy": {"in": "PASS"}}]
            }]
        })
    }

    #[test]
    fn test_parse_facts() {
        assert_eq!(
            facts(),
            json!({
                "as_number": "65000",
                "neighbors": [{
                    "neighbor": "10.0.0.1",
                    "address_family": [
                        {
                            "afi": "ipv4",
                            "safi": "unicast",
                            "maximum_prefix": {"max_limit": 1000, "threshold_value": 80, "warning_only": true},
                            "next_hop_self": {"set": true},
                            "route_policy": {"in": "PASS"}
                        },
                        {"afi": "ipv6", "safi": "unicast", "allowas_in": {"value": 3}}
                    ]
                }],
                "vrfs": [{
                    "vrf": "blue",
                    "neighbors": [{
                        "neighbor": "10.1.1.1",
                        "address_family": [{
                            "afi": "ipv4",
                            "safi": "unicast",
                            "send_community_ebgp": {"set": true},
                            "weight": 100
                        }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_merged() {
        let commands = generate(
            json!({
                "as_number": 65000,
                "neighbors": [{
                    "neighbor": "10.0.0.1",
                    "address_family": [{"afi": "ipv4", "safi": "unicast", "route_policy": {"out": "DROP"}}]
                }]
            }),
            State::Merged,
        );
        assert_eq!(
            commands,
            vec![
                "router bgp 65000",
                "neighbor 10.0.0.1",
                "address-family ipv4 unicast",
                "route-policy DROP out"
            ]
        );
    }

    #[test]
    fn test_idempotent_states() {
        for state in [State::Merged, State::Replaced, State::Overridden] {
            let commands = generate(facts(), state);
            assert!(commands.is_empty(), "{} produced {:?}", state, commands);
        }
    }

    #[test]
    fn test_replaced() {
        assert_eq!(
            generate(one_af_want(), State::Replaced),
            vec![
                "router bgp 65000",
                "neighbor 10.0.0.1",
                "address-family ipv4 unicast",
                "no maximum-prefix 1000 80 warning-only",
                "no next-hop-self",
                "no address-family ipv6 unicast"
            ]
        );
    }

    #[test]
    fn test_overridden_clears_unlisted() {
        assert_eq!(
            generate(one_af_want(), State::Overridden),
            vec![
                "router bgp 65000",
                "neighbor 10.0.0.1",
                "address-family ipv4 unicast",
                "no maximum-prefix 1000 80 warning-only",
                "no next-hop-self",
                "no address-family ipv6 unicast",
                "vrf blue",
                "neighbor 10.1.1.1",
                "no address-family ipv4 unicast"
            ]
        );
    }

    #[test]
    fn test_deleted_all() {
        assert_eq!(
            generate(json!({}), State::Deleted),
            vec![
                "router bgp 65000",
                "neighbor 10.0.0.1",
                "no address-family ipv4 unicast",
                "no address-family ipv6 unicast",
                "vrf blue",
                "neighbor 10.1.1.1",
                "no address-family ipv4 unicast"
            ]
        );
    }

    #[test]
    fn test_deleted_listed_vrf() {
        assert_eq!(
            generate(json!({"as_number": "65000", "vrfs": [{"vrf": "blue"}]}), State::Deleted),
            vec![
                "router bgp 65000",
                "vrf blue",
                "neighbor 10.1.1.1",
                "no address-family ipv4 unicast"
            ]
        );
    }

    #[test]
    fn test_rendered_new_address_family() {
        let commands = BgpNeighborAddressFamily
            .generate_commands(
                &want(json!({
                    "as_number": "65000",
                    "neighbors": [{
                        "neighbor": "10.0.0.9",
                        "address_family": [
                            {"afi": "ipv4", "safi": "unicast"},
                            {"afi": "vpnv4", "safi": "unicast", "next_hop_self": {"set": true}}
                        ]
                    }]
                })),
                empty(),
                State::Rendered,
            )
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "router bgp 65000",
                "neighbor 10.0.0.9",
                "address-family ipv4 unicast",
                "address-family vpnv4 unicast",
                "next-hop-self"
            ]
        );
    }

    #[test]
    fn test_rejects_other_as_and_purged() {
        let err = BgpNeighborAddressFamily
            .generate_commands(&want(json!({"as_number": "1"})), &have(), State::Replaced)
            .unwrap_err();
        assert!(matches!(err, ModuleError::InvalidParameter(_)));

        assert!(!BgpNeighborAddressFamily.supported_states().contains(&State::Purged));
        let err = BgpNeighborAddressFamily
            .generate_commands(&json!({}), &have(), State::Purged)
            .unwrap_err();
        assert!(matches!(err, ModuleError::Unsupported(_)));
    }

    #[test]
    fn test_duplicate_address_family() {
        let config = BgpNeighborAddressFamily
            .validate_config(&json!({
                "as_number": "1",
                "neighbors": [{
                    "neighbor": "10.0.0.1",
                    "address_family": [{"afi": "ipv4", "safi": "unicast"}, {"afi": "ipv4", "safi": "unicast"}]
                }]
            }))
            .unwrap();
        assert!(matches!(
            list_to_dict(&config, COLLECTIONS),
            Err(ModuleError::InvalidParameter(_))
        ));
    }
}
