//! Rule table of the BGP neighbor address-family resource.

use crate::modules::network::common::nest;
use crate::modules::network::template::{NetworkTemplate, ParserRule, Setval};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Key under `vrfs` that holds router-level neighbors in parser output.
pub(crate) const GLOBAL_VRF_KEY: &str = "vrf_";

const ROUTER: &[&str] = &["router"];
const ROUTER_OR_VRF: &[&str] = &["router", "vrf"];
const NEIGHBOR: &[&str] = &["neighbor"];
const ADDRESS_FAMILY: &[&str] = &["address_family"];

fn in_vrf(body: Value) -> Value {
    nest("vrfs", nest("{{ 'vrf_' ~ vrf|default('') }}", body))
}

fn in_neighbor(body: Value) -> Value {
    in_vrf(nest("neighbors", nest("{{ neighbor }}", body)))
}

fn in_af(body: Value) -> Value {
    in_neighbor(nest("address_family", nest("{{ afi }}_{{ safi }}", body)))
}

fn at(path: &str, leaf: Value) -> Value {
    path.rsplit('.').fold(leaf, |acc, segment| nest(segment, acc))
}

/// A line inside an `address-family` block.
fn af(
    name: &'static str,
    getval: &str,
    setval: Setval,
    compval: &'static str,
    leaf: Value,
) -> ParserRule {
    ParserRule::new(name, getval, setval)
        .compval(compval)
        .result(in_af(at(compval, leaf)))
        .scope(ADDRESS_FAMILY)
}

fn flag(name: &'static str, getval: &str, command: &'static str, compval: &'static str) -> ParserRule {
    af(name, getval, Setval::Template(command), compval, json!(true))
}

fn render_allowas_in(data: &Value) -> Option<String> {
    let allowas_in = data.get("allowas_in")?;
    match (allowas_in.get("value"), allowas_in.get("set")) {
        (Some(value), _) => Some(format!("allowas-in {}", value)),
        (None, Some(Value::Bool(true))) => Some("allowas-in".to_string()),
        _ => None,
    }
}

fn render_maximum_prefix(data: &Value) -> Option<String> {
    let max = data.get("maximum_prefix")?;
    let mut command = format!("maximum-prefix {}", max.get("max_limit")?);
    if let Some(threshold) = max.get("threshold_value") {
        command.push_str(&format!(" {}", threshold));
    }
    if let Some(restart) = max.get("restart") {
        command.push_str(&format!(" restart {}", restart));
    } else if max.get("warning_only") == Some(&Value::Bool(true)) {
        command.push_str(" warning-only");
    }
    if max.get("discard_extra_paths") == Some(&Value::Bool(true)) {
        command.push_str(" discard-extra-paths");
    }
    Some(command)
}

pub(crate) static TEMPLATE: Lazy<NetworkTemplate> = Lazy::new(|| {
    NetworkTemplate::new(vec![
        ParserRule::new(
            "router",
            r"^router\sbgp\s(?P<as_number>\S+)$",
            Setval::Template("router bgp {{ as_number }}"),
        )
        .result(json!({"as_number": "{{ as_number }}"}))
        .shared(),
        ParserRule::new(
            "vrf",
            r"^\s+vrf\s(?P<vrf>\S+)$",
            Setval::Template("vrf {{ vrf }}"),
        )
        .result(in_vrf(json!({"vrf": "{{ vrf }}"})))
        .shared()
        .scope(ROUTER),
        ParserRule::new(
            "neighbor",
            r"^\s+neighbor\s(?P<neighbor>\S+)$",
            Setval::Template("neighbor {{ neighbor }}"),
        )
        .result(in_neighbor(json!({"neighbor": "{{ neighbor }}"})))
        .shared()
        .scope(ROUTER_OR_VRF),
        ParserRule::new(
            "address_family",
            r"^\s+address-family\s(?P<afi>ipv4|ipv6|vpnv4|vpnv6|l2vpn)\s(?P<safi>\S+)$",
            Setval::Template("address-family {{ afi }} {{ safi }}"),
        )
        .result(in_af(json!({"afi": "{{ afi }}", "safi": "{{ safi }}"})))
        .shared()
        .scope(NEIGHBOR),
        af(
            "allowas_in",
            r"^\s+allowas-in(\s(?P<value>\d+))?$",
            Setval::Func(render_allowas_in),
            "allowas_in",
            json!({
                "set": "{{ true if value is not defined }}",
                "value": "{{ value|int if value is defined }}"
            }),
        ),
        flag("as_override", r"^\s+as-override$", "as-override", "as_override.set"),
        flag(
            "as_override_inheritance_disable",
            r"^\s+as-override\sinheritance-disable$",
            "as-override inheritance-disable",
            "as_override.inheritance_disable",
        ),
        flag(
            "bestpath_origin_as_allow_invalid",
            r"^\s+bestpath\sorigin-as\sallow\sinvalid$",
            "bestpath origin-as allow invalid",
            "bestpath_origin_as_allow_invalid",
        ),
        af(
            "capability_orf_prefix",
            r"^\s+capability\sorf\sprefix\s(?P<value>both|send|receive|none)$",
            Setval::Template("capability orf prefix {{ capability_orf_prefix }}"),
            "capability_orf_prefix",
            json!("{{ value }}"),
        ),
        flag(
            "default_originate",
            r"^\s+default-originate$",
            "default-originate",
            "default_originate.set",
        ),
        af(
            "default_originate_route_policy",
            r"^\s+default-originate\sroute-policy\s(?P<value>\S+)$",
            Setval::Template("default-originate route-policy {{ default_originate.route_policy }}"),
            "default_originate.route_policy",
            json!("{{ value }}"),
        ),
        flag(
            "default_originate_inheritance_disable",
            r"^\s+default-originate\sinheritance-disable$",
            "default-originate inheritance-disable",
            "default_originate.inheritance_disable",
        ),
        flag(
            "long_lived_graceful_restart_capable",
            r"^\s+long-lived-graceful-restart\scapable$",
            "long-lived-graceful-restart capable",
            "long_lived_graceful_restart.capable",
        ),
        af(
            "long_lived_graceful_restart_stale_time",
            r"^\s+long-lived-graceful-restart\sstale-time\ssend\s(?P<value>\d+)$",
            Setval::Template(
                "long-lived-graceful-restart stale-time send {{ long_lived_graceful_restart.stale_time_send }}",
            ),
            "long_lived_graceful_restart.stale_time_send",
            json!("{{ value|int }}"),
        ),
        ParserRule::new(
            "maximum_prefix",
            r"^\s+maximum-prefix\s(?P<max_limit>\d+)(\s(?P<threshold>\d+))?(\srestart\s(?P<restart>\d+))?(?P<warning_only>\swarning-only)?(?P<discard>\sdiscard-extra-paths)?$",
            Setval::Func(render_maximum_prefix),
        )
        .result(in_af(json!({
            "maximum_prefix": {
                "max_limit": "{{ max_limit|int }}",
                "threshold_value": "{{ threshold|int if threshold is defined }}",
                "restart": "{{ restart|int if restart is defined }}",
                "warning_only": "{{ true if warning_only is defined }}",
                "discard_extra_paths": "{{ true if discard is defined }}"
            }
        })))
        .scope(ADDRESS_FAMILY),
        flag("multipath", r"^\s+multipath$", "multipath", "multipath"),
        flag("next_hop_self", r"^\s+next-hop-self$", "next-hop-self", "next_hop_self.set"),
        flag(
            "next_hop_self_inheritance_disable",
            r"^\s+next-hop-self\sinheritance-disable$",
            "next-hop-self inheritance-disable",
            "next_hop_self.inheritance_disable",
        ),
        flag(
            "next_hop_unchanged",
            r"^\s+next-hop-unchanged$",
            "next-hop-unchanged",
            "next_hop_unchanged.set",
        ),
        flag(
            "next_hop_unchanged_inheritance_disable",
            r"^\s+next-hop-unchanged\sinheritance-disable$",
            "next-hop-unchanged inheritance-disable",
            "next_hop_unchanged.inheritance_disable",
        ),
        flag(
            "next_hop_unchanged_multipath",
            r"^\s+next-hop-unchanged\smultipath$",
            "next-hop-unchanged multipath",
            "next_hop_unchanged.multipath",
        ),
        af(
            "orf_route_policy",
            r"^\s+orf\sroute-policy\s(?P<value>\S+)$",
            Setval::Template("orf route-policy {{ orf_route_policy }}"),
            "orf_route_policy",
            json!("{{ value }}"),
        ),
        flag(
            "origin_as_validation_disable",
            r"^\s+origin-as\svalidation\sdisable$",
            "origin-as validation disable",
            "origin_as.validation.disable",
        ),
        flag(
            "remove_private_as",
            r"^\s+remove-private-AS$",
            "remove-private-AS",
            "remove_private_as.set",
        ),
        flag(
            "remove_private_as_inbound",
            r"^\s+remove-private-AS\sinbound$",
            "remove-private-AS inbound",
            "remove_private_as.inbound",
        ),
        flag(
            "remove_private_as_entire_aspath",
            r"^\s+remove-private-AS\sentire-aspath$",
            "remove-private-AS entire-aspath",
            "remove_private_as.entire_aspath",
        ),
        flag(
            "remove_private_as_inheritance_disable",
            r"^\s+remove-private-AS\sinheritance-disable$",
            "remove-private-AS inheritance-disable",
            "remove_private_as.inheritance_disable",
        ),
        af(
            "route_policy_in",
            r"^\s+route-policy\s(?P<value>\S+)\sin$",
            Setval::Template("route-policy {{ route_policy['in'] }} in"),
            "route_policy.in",
            json!("{{ value }}"),
        ),
        af(
            "route_policy_out",
            r"^\s+route-policy\s(?P<value>\S+)\sout$",
            Setval::Template("route-policy {{ route_policy.out }} out"),
            "route_policy.out",
            json!("{{ value }}"),
        ),
        flag(
            "route_reflector_client",
            r"^\s+route-reflector-client$",
            "route-reflector-client",
            "route_reflector_client.set",
        ),
        flag(
            "route_reflector_client_inheritance_disable",
            r"^\s+route-reflector-client\sinheritance-disable$",
            "route-reflector-client inheritance-disable",
            "route_reflector_client.inheritance_disable",
        ),
        flag(
            "send_community_ebgp",
            r"^\s+send-community-ebgp$",
            "send-community-ebgp",
            "send_community_ebgp.set",
        ),
        flag(
            "send_community_ebgp_inheritance_disable",
            r"^\s+send-community-ebgp\sinheritance-disable$",
            "send-community-ebgp inheritance-disable",
            "send_community_ebgp.inheritance_disable",
        ),
        flag(
            "send_community_gshut_ebgp",
            r"^\s+send-community-gshut-ebgp$",
            "send-community-gshut-ebgp",
            "send_community_gshut_ebgp.set",
        ),
        flag(
            "send_community_gshut_ebgp_inheritance_disable",
            r"^\s+send-community-gshut-ebgp\sinheritance-disable$",
            "send-community-gshut-ebgp inheritance-disable",
            "send_community_gshut_ebgp.inheritance_disable",
        ),
        flag(
            "send_extended_community_ebgp",
            r"^\s+send-extended-community-ebgp$",
            "send-extended-community-ebgp",
            "send_extended_community_ebgp.set",
        ),
        flag(
            "send_extended_community_ebgp_inheritance_disable",
            r"^\s+send-extended-community-ebgp\sinheritance-disable$",
            "send-extended-community-ebgp inheritance-disable",
            "send_extended_community_ebgp.inheritance_disable",
        ),
        flag(
            "soft_reconfiguration_inbound_always",
            r"^\s+soft-reconfiguration\sinbound\salways$",
            "soft-reconfiguration inbound always",
            "soft_reconfiguration.inbound_always",
        ),
        flag(
            "soft_reconfiguration_inbound_inheritance_disable",
            r"^\s+soft-reconfiguration\sinbound\sinheritance-disable$",
            "soft-reconfiguration inbound inheritance-disable",
            "soft_reconfiguration.inbound_inheritance_disable",
        ),
        af(
            "weight",
            r"^\s+weight\s(?P<value>\d+)$",
            Setval::Template("weight {{ weight }}"),
            "weight",
            json!("{{ value|int }}"),
        ),
    ])
});

/// Field rules of an address family, in table order.
pub(crate) static AF_PARSERS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    TEMPLATE
        .parsers()
        .iter()
        .filter(|rule| !rule.shared && rule.scope.contains(&"address_family"))
        .map(|rule| rule.name)
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_maximum_prefix() {
        let data = json!({"maximum_prefix": {"max_limit": 100, "threshold_value": 80, "warning_only": true}});
        assert_eq!(
            TEMPLATE.render(&data, "maximum_prefix", false).unwrap(),
            "maximum-prefix 100 80 warning-only"
        );
        let data = json!({"maximum_prefix": {"max_limit": 5, "restart": 10, "discard_extra_paths": true}});
        assert_eq!(
            TEMPLATE.render(&data, "maximum_prefix", true).unwrap(),
            "no maximum-prefix 5 restart 10 discard-extra-paths"
        );
    }

    #[test]
    fn test_render_allowas_in() {
        assert_eq!(
            TEMPLATE.render(&json!({"allowas_in": {"value": 3}}), "allowas_in", false).unwrap(),
            "allowas-in 3"
        );
        assert_eq!(
            TEMPLATE.render(&json!({"allowas_in": {"set": true}}), "allowas_in", false).unwrap(),
            "allowas-in"
        );
        assert_eq!(
            TEMPLATE.render(&json!({"allowas_in": {"set": false}}), "allowas_in", false).unwrap(),
            ""
        );
    }

    #[test]
    fn test_route_policy_direction() {
        let data = json!({"route_policy": {"in": "PASS", "out": "DROP"}});
        assert_eq!(
            TEMPLATE.render(&data, "route_policy_in", false).unwrap(),
            "route-policy PASS in"
        );
        assert_eq!(
            TEMPLATE.render(&data, "route_policy_out", true).unwrap(),
            "no route-policy DROP out"
        );
    }

    /// Device lines for the address-family rules; some rules have more than
    /// one form.
    const SAMPLES: &[(&str, &str)] = &[
        ("allowas_in", "allowas-in 3"),
        ("allowas_in", "allowas-in"),
        ("as_override", "as-override"),
        ("as_override_inheritance_disable", "as-override inheritance-disable"),
        ("bestpath_origin_as_allow_invalid", "bestpath origin-as allow invalid"),
        ("capability_orf_prefix", "capability orf prefix both"),
        ("default_originate", "default-originate"),
        ("default_originate_route_policy", "default-originate route-policy DEFAULT"),
        ("default_originate_inheritance_disable", "default-originate inheritance-disable"),
        ("long_lived_graceful_restart_capable", "long-lived-graceful-restart capable"),
        ("long_lived_graceful_restart_stale_time", "long-lived-graceful-restart stale-time send 3600"),
        ("maximum_prefix", "maximum-prefix 1000"),
        ("maximum_prefix", "maximum-prefix 1000 75 warning-only"),
        ("maximum_prefix", "maximum-prefix 1000 75 restart 5 discard-extra-paths"),
        ("multipath", "multipath"),
        ("next_hop_self", "next-hop-self"),
        ("next_hop_self_inheritance_disable", "next-hop-self inheritance-disable"),
        ("next_hop_unchanged", "next-hop-unchanged"),
        ("next_hop_unchanged_inheritance_disable", "next-hop-unchanged inheritance-disable"),
        ("next_hop_unchanged_multipath", "next-hop-unchanged multipath"),
        ("orf_route_policy", "orf route-policy ORF"),
        ("origin_as_validation_disable", "origin-as validation disable"),
        ("remove_private_as", "remove-private-AS"),
        ("remove_private_as_inbound", "remove-private-AS inbound"),
        ("remove_private_as_entire_aspath", "remove-private-AS entire-aspath"),
        ("remove_private_as_inheritance_disable", "remove-private-AS inheritance-disable"),
        ("route_policy_in", "route-policy PASS in"),
        ("route_policy_out", "route-policy DROP out"),
        ("route_reflector_client", "route-reflector-client"),
        ("route_reflector_client_inheritance_disable", "route-reflector-client inheritance-disable"),
        ("send_community_ebgp", "send-community-ebgp"),
        ("send_community_ebgp_inheritance_disable", "send-community-ebgp inheritance-disable"),
        ("send_community_gshut_ebgp", "send-community-gshut-ebgp"),
        ("send_community_gshut_ebgp_inheritance_disable", "send-community-gshut-ebgp inheritance-disable"),
        ("send_extended_community_ebgp", "send-extended-community-ebgp"),
        ("send_extended_community_ebgp_inheritance_disable", "send-extended-community-ebgp inheritance-disable"),
        ("soft_reconfiguration_inbound_always", "soft-reconfiguration inbound always"),
        ("soft_reconfiguration_inbound_inheritance_disable", "soft-reconfiguration inbound inheritance-disable"),
        ("weight", "weight 100"),
    ];

    #[test]
    fn test_every_rule_round_trips() {
        for rule in AF_PARSERS.iter() {
            assert!(
                SAMPLES.iter().any(|(name, _)| name == rule),
                "no sample line for rule '{}'",
                rule
            );
        }

        let placements = [
            (
                "router bgp 65000\n neighbor 10.0.0.1\n  address-family ipv4 unicast\n   ",
                "/vrfs/vrf_/neighbors/10.0.0.1/address_family/ipv4_unicast",
            ),
            (
                "router bgp 65000\n vrf blue\n  neighbor 10.1.1.1\n   address-family ipv4 unicast\n    ",
                "/vrfs/vrf_blue/neighbors/10.1.1.1/address_family/ipv4_unicast",
            ),
        ];

        for (rule, line) in SAMPLES {
            for (prefix, pointer) in placements {
                let parsed = Value::Object(TEMPLATE.parse(&format!("{}{}\n", prefix, line)));
                let entry = parsed
                    .pointer(pointer)
                    .unwrap_or_else(|| panic!("'{}' parsed to {}", line, parsed));

                let rendered = TEMPLATE.render(entry, rule, false).unwrap();
                assert_eq!(&rendered, line, "rule '{}'", rule);
                assert_eq!(
                    Value::Object(TEMPLATE.parse(&format!("{}{}\n", prefix, rendered))),
                    parsed
                );
                assert_eq!(
                    TEMPLATE.render(entry, "address_family", false).unwrap(),
                    "address-family ipv4 unicast"
                );
            }
        }
    }

    #[test]
    fn test_af_parsers_exclude_contexts() {
        assert!(!AF_PARSERS.contains(&"address_family"));
        assert!(!AF_PARSERS.contains(&"neighbor"));
        assert_eq!(AF_PARSERS.first(), Some(&"allowas_in"));
        assert_eq!(AF_PARSERS.last(), Some(&"weight"));
    }
}
