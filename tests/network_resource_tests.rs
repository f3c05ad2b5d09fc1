//! Integration tests for the network resource modules
//!
//! These drive the modules the way a caller does: through the registry, with
//! a device connection that serves a captured running configuration.

mod common;

use common::*;
use netresource::modules::network::CapturedConfig;
use netresource::modules::{ModuleContext, ModuleError, ModuleRegistry};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

const BGP_CONTEXTS: &[&str] = &["router bgp", "neighbor ", "vrf ", "address-family ", "rpki server "];

fn registry() -> ModuleRegistry {
    ModuleRegistry::with_builtins()
}

fn gathered(module: &str, running: &str) -> Value {
    let device = RecordingDevice::new("xr1", running);
    let output = registry()
        .execute(module, &params(None, "gathered"), &context_for(&device, true))
        .unwrap();
    assert!(!output.changed);
    output.data["gathered"].clone()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_merged_changes_only_remote_as() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let config = json!({
        "as_number": "65000",
        "neighbors": [{"neighbor": "10.0.0.1", "remote_as": "65002"}]
    });

    let output = registry()
        .execute(
            "iosxr_bgp_global",
            &params(Some(config), "merged"),
            &context_for(&device, true),
        )
        .unwrap();

    assert!(output.changed);
    assert_eq!(
        commands_of(&output),
        vec!["router bgp 65000", "neighbor 10.0.0.1", "remote-as 65002"]
    );
    assert!(device.pushed().is_empty());
    assert_eq!(device.show_commands(), vec!["show running-config router bgp"]);
}

#[test]
fn test_replaced_removes_vrf_with_one_command() {
    let mut config = gathered("iosxr_bgp_global", RUNNING_CONFIG);
    config.as_object_mut().unwrap().shift_remove("vrfs");

    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let output = registry()
        .execute(
            "iosxr_bgp_global",
            &params(Some(config), "replaced"),
            &context_for(&device, true),
        )
        .unwrap();

    assert_eq!(commands_of(&output), vec!["router bgp 65000", "no vrf blue"]);
}

#[test]
fn test_deleted_negates_router_context_only() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let output = registry()
        .execute(
            "iosxr_bgp_global",
            &params(Some(json!({"as_number": 65000})), "deleted"),
            &context_for(&device, true),
        )
        .unwrap();

    assert_eq!(commands_of(&output), vec!["no router bgp 65000"]);
}

#[test]
fn test_gathered_two_interfaces() {
    assert_eq!(
        gathered("iosxr_interfaces", TWO_INTERFACES),
        json!([
            {"name": "GigabitEthernet0/0/0/1", "description": "to core", "mtu": 1514},
            {"name": "GigabitEthernet0/0/0/2", "enabled": false}
        ])
    );
}

// ============================================================================
// Facts
// ============================================================================

#[test]
fn test_gathered_ignores_unmanaged_blocks() {
    let interfaces = gathered("iosxr_interfaces", RUNNING_CONFIG);
    assert_eq!(
        interfaces,
        json!([
            {"name": "Loopback0", "description": "router id"},
            {"name": "GigabitEthernet0/0/0/0", "description": "uplink", "mtu": 9000}
        ])
    );

    let naf = gathered("iosxr_bgp_neighbor_address_family", RUNNING_CONFIG);
    assert_eq!(
        naf,
        json!({
            "as_number": "65000",
            "neighbors": [{
                "neighbor": "10.0.0.1",
                "address_family": [{"afi": "ipv4", "safi": "unicast", "route_policy": {"in": "PASS"}}]
            }],
            "vrfs": [{
                "vrf": "blue",
                "neighbors": [{
                    "neighbor": "10.1.1.1",
                    "address_family": [{"afi": "ipv4", "safi": "unicast", "weight": 100}]
                }]
            }]
        })
    );
}

#[test]
fn test_gathered_empty_device() {
    assert_eq!(gathered("iosxr_interfaces", "hostname xr1\n"), json!([]));
    assert_eq!(gathered("iosxr_bgp_global", "hostname xr1\n"), json!({}));
}

#[test]
fn test_parsed_matches_gathered() {
    let output = registry()
        .execute(
            "iosxr_bgp_global",
            &parsed_params(RUNNING_CONFIG),
            &ModuleContext::new(),
        )
        .unwrap();
    assert_eq!(
        output.data["parsed"],
        gathered("iosxr_bgp_global", RUNNING_CONFIG)
    );
}

#[test]
fn test_captured_config_connection() {
    let device = CapturedConfig::new("xr1", format!("show running-config\n{}", RUNNING_CONFIG));
    let context = ModuleContext::new()
        .with_check_mode(true)
        .with_connection(Arc::new(device));
    let output = registry()
        .execute("iosxr_interfaces", &params(None, "gathered"), &context)
        .unwrap();
    assert_eq!(output.data["gathered"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Idempotence and Minimality
// ============================================================================

#[test]
fn test_gathered_facts_are_idempotent() {
    for module in [
        "iosxr_interfaces",
        "iosxr_bgp_global",
        "iosxr_bgp_neighbor_address_family",
    ] {
        let facts = gathered(module, RUNNING_CONFIG);
        for state in ["merged", "replaced", "overridden"] {
            let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
            let output = registry()
                .execute(
                    module,
                    &params(Some(facts.clone()), state),
                    &context_for(&device, false),
                )
                .unwrap();
            assert!(!output.changed, "{} {} changed", module, state);
            assert!(commands_of(&output).is_empty());
            assert!(device.pushed().is_empty());
        }
    }
}

#[test]
fn test_no_context_without_children() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let config = json!({
        "as_number": "65000",
        "neighbors": [
            {"neighbor": "10.0.0.1", "remote_as": "65001", "description": "peer one"},
            {"neighbor": "10.0.0.9", "remote_as": "65009"}
        ],
        "vrfs": [{"vrf": "blue", "rd": {"auto": true}}]
    });
    let output = registry()
        .execute(
            "iosxr_bgp_global",
            &params(Some(config), "merged"),
            &context_for(&device, true),
        )
        .unwrap();

    let commands = commands_of(&output);
    assert_eq!(
        commands,
        vec!["router bgp 65000", "neighbor 10.0.0.9", "remote-as 65009"]
    );
    assert_no_empty_contexts(&commands, BGP_CONTEXTS);
}

#[test]
fn test_address_family_overridden_is_minimal() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let config = json!({
        "as_number": "65000",
        "neighbors": [{
            "neighbor": "10.0.0.1",
            "address_family": [{"afi": "ipv4", "safi": "unicast", "route_policy": {"in": "PASS"}}]
        }]
    });
    let output = registry()
        .execute(
            "iosxr_bgp_neighbor_address_family",
            &params(Some(config), "overridden"),
            &context_for(&device, true),
        )
        .unwrap();

    let commands = commands_of(&output);
    assert_eq!(
        commands,
        vec![
            "router bgp 65000",
            "vrf blue",
            "neighbor 10.1.1.1",
            "no address-family ipv4 unicast"
        ]
    );
    assert_no_empty_contexts(&commands, BGP_CONTEXTS);
}

// ============================================================================
// Applying Commands
// ============================================================================

#[test]
fn test_commands_pushed_outside_check_mode() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let config = json!([{"name": "GigabitEthernet0/0/0/0", "mtu": 1500}]);

    let output = registry()
        .execute(
            "iosxr_interfaces",
            &params(Some(config), "merged"),
            &context_for(&device, false),
        )
        .unwrap();

    assert!(output.changed);
    assert_eq!(
        device.pushed(),
        vec![vec![
            "interface GigabitEthernet0/0/0/0".to_string(),
            "mtu 1500".to_string()
        ]]
    );
    assert!(output.data.contains_key("before"));
    assert!(output.data.contains_key("after"));
}

#[test]
fn test_check_mode_never_pushes() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let output = registry()
        .execute(
            "iosxr_interfaces",
            &params(Some(json!([{"name": "Loopback1"}])), "purged"),
            &context_for(&device, true),
        )
        .unwrap();
    assert!(!output.changed);

    let output = registry()
        .execute(
            "iosxr_interfaces",
            &params(Some(json!([{"name": "Loopback0"}])), "purged"),
            &context_for(&device, true),
        )
        .unwrap();
    assert!(output.changed);
    assert_eq!(commands_of(&output), vec!["no interface Loopback0"]);
    assert!(device.pushed().is_empty());
    assert!(!output.data.contains_key("after"));
}

#[test]
fn test_read_only_device_rejects_push() {
    let device = CapturedConfig::new("xr1", RUNNING_CONFIG);
    let context = ModuleContext::new().with_connection(Arc::new(device));
    let err = registry()
        .execute(
            "iosxr_interfaces",
            &params(Some(json!([{"name": "Loopback0", "mtu": 1500}])), "merged"),
            &context,
        )
        .unwrap_err();
    assert!(matches!(err, ModuleError::Unsupported(_)));
}

#[test]
fn test_diff_mode_attaches_commands() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let context = context_for(&device, true).with_diff_mode(true);
    let output = registry()
        .execute(
            "iosxr_bgp_global",
            &params(Some(json!({"as_number": "65000"})), "deleted"),
            &context,
        )
        .unwrap();
    let diff = output.diff.expect("diff requested");
    assert_eq!(diff.details.as_deref(), Some("no router bgp 65000"));
}

#[test]
fn test_rendered_needs_no_device() {
    let config = json!({
        "as_number": 65000,
        "neighbors": [{
            "neighbor": "10.0.0.5",
            "address_family": [{"afi": "ipv6", "safi": "unicast", "next_hop_self": {"set": true}}]
        }]
    });
    let output = registry()
        .execute(
            "iosxr_bgp_neighbor_address_family",
            &params(Some(config), "rendered"),
            &ModuleContext::new(),
        )
        .unwrap();
    assert!(!output.changed);
    assert_eq!(
        commands_of(&output),
        vec![
            "router bgp 65000",
            "neighbor 10.0.0.5",
            "address-family ipv6 unicast",
            "next-hop-self"
        ]
    );
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_config_and_running_config_are_exclusive() {
    let mut params = parsed_params(RUNNING_CONFIG);
    params.insert("config".to_string(), json!({"as_number": "65000"}));
    let err = registry()
        .execute("iosxr_bgp_global", &params, &ModuleContext::new())
        .unwrap_err();
    assert!(matches!(err, ModuleError::InvalidParameter(_)));
}

#[test]
fn test_required_inputs() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    for state in ["merged", "replaced", "overridden", "rendered"] {
        let err = registry()
            .execute(
                "iosxr_interfaces",
                &params(None, state),
                &context_for(&device, true),
            )
            .unwrap_err();
        assert!(matches!(err, ModuleError::MissingParameter(_)), "{}", state);
    }

    let err = registry()
        .execute(
            "iosxr_interfaces",
            &params(None, "parsed"),
            &ModuleContext::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ModuleError::MissingParameter(_)));
}

#[test]
fn test_device_required_for_config_states() {
    let err = registry()
        .execute(
            "iosxr_interfaces",
            &params(Some(json!([{"name": "Loopback0"}])), "merged"),
            &ModuleContext::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ModuleError::ExecutionFailed(_)));
}

#[test]
fn test_invalid_inputs_produce_no_commands() {
    let device = RecordingDevice::new("xr1", RUNNING_CONFIG);
    let cases = [
        ("iosxr_interfaces", json!([{"name": "Gi0"}, {"name": "Gi0"}]), "merged"),
        ("iosxr_interfaces", json!([{"description": "no name"}]), "merged"),
        ("iosxr_interfaces", json!([{"name": "Gi0", "speed": "fast"}]), "merged"),
        ("iosxr_bgp_global", json!({"as_number": "65000"}), "sideways"),
        (
            "iosxr_bgp_global",
            json!({"as_number": "65000", "timers": {"keepalive_time": 10}}),
            "replaced",
        ),
        (
            "iosxr_bgp_global",
            json!({"as_number": "65000", "neighbors": [{"neighbor": "10.0.0.1", "timers": {"holdtime": 30}}]}),
            "merged",
        ),
        ("iosxr_bgp_neighbor_address_family", json!({"as_number": "65000"}), "purged"),
    ];

    for (module, config, state) in cases {
        let err = registry()
            .execute(module, &params(Some(config), state), &context_for(&device, false))
            .unwrap_err();
        assert!(
            matches!(
                err,
                ModuleError::InvalidParameter(_) | ModuleError::MissingParameter(_)
            ),
            "{} {}: {:?}",
            module,
            state,
            err
        );
    }
    assert!(device.pushed().is_empty());
}

#[test]
fn test_unknown_module() {
    let err = registry()
        .execute("iosxr_ospfv2", &params(None, "gathered"), &ModuleContext::new())
        .unwrap_err();
    assert!(matches!(err, ModuleError::NotFound(_)));
}
