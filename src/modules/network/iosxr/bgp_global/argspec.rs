//! Typed configuration of the BGP global resource.
//!
//! Every option is optional so the same types describe a sparse want, a
//! deletion target and parsed facts.

use crate::modules::network::iosxr::string_or_number;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BgpGlobalConfig {
    #[serde(default, deserialize_with = "string_or_number")]
    pub as_number: Option<String>,
    pub bfd: Option<Bfd>,
    pub bgp: Option<BgpOptions>,
    pub default_information: Option<DefaultInformation>,
    pub default_metric: Option<u32>,
    pub ibgp: Option<Ibgp>,
    pub mvpn: Option<bool>,
    pub nsr: Option<Nsr>,
    pub socket: Option<Socket>,
    pub timers: Option<Timers>,
    pub update: Option<Update>,
    pub rpki: Option<Rpki>,
    pub neighbors: Option<Vec<Neighbor>>,
    pub vrfs: Option<Vec<Vrf>>,
}

// ============================================================================
// Shared blocks
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bfd {
    pub minimum_interval: Option<u32>,
    pub multiplier: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Timers {
    pub keepalive_time: Option<u32>,
    pub holdtime: Option<u32>,
}

impl Timers {
    /// The field left unset when only one of the pair is given.
    ///
    /// `timers` renders as a single line carrying both values.
    pub fn missing_field(&self) -> Option<&'static str> {
        match (self.keepalive_time, self.holdtime) {
            (Some(_), None) => Some("holdtime"),
            (None, Some(_)) => Some("keepalive_time"),
            _ => None,
        }
    }
}

impl BgpGlobalConfig {
    /// Path of the first `timers` block that sets only one of its values.
    pub fn incomplete_timers(&self) -> Option<String> {
        fn check(timers: &Option<Timers>, path: String) -> Option<String> {
            let field = timers.as_ref()?.missing_field()?;
            Some(format!("{}.timers.{}", path, field))
        }
        fn neighbors(list: &Option<Vec<Neighbor>>, path: &str) -> Option<String> {
            list.iter().flatten().find_map(|n| {
                let name = n.neighbor.as_deref().unwrap_or("?");
                check(&n.timers, format!("{}neighbors[{}]", path, name))
            })
        }

        check(&self.timers, "config".to_string())
            .or_else(|| neighbors(&self.neighbors, "config."))
            .or_else(|| {
                self.vrfs.iter().flatten().find_map(|v| {
                    let path = format!("config.vrfs[{}]", v.vrf.as_deref().unwrap_or("?"));
                    check(&v.timers, path.clone())
                        .or_else(|| neighbors(&v.neighbors, &format!("{}.", path)))
                })
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Socket {
    pub receive_buffer_size: Option<u32>,
    pub send_buffer_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultInformation {
    pub originate: Option<bool>,
}

/// A `disable` knob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Disable {
    pub disable: Option<bool>,
}

/// A knob that can be set or have inheritance from groups disabled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inheritable {
    pub set: Option<bool>,
    pub inheritance_disable: Option<bool>,
}

// ============================================================================
// bgp ...
// ============================================================================

/// `bgp ...` options valid at the router level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BgpOptions {
    pub auto_policy_soft_reset: Option<Disable>,
    pub bestpath: Option<Bestpath>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cluster_id: Option<String>,
    pub confederation: Option<Confederation>,
    pub default: Option<BgpDefault>,
    pub enforce_first_as: Option<Disable>,
    pub fast_external_fallover: Option<Disable>,
    pub graceful_restart: Option<GracefulRestart>,
    pub install: Option<Install>,
    pub log: Option<Log>,
    pub maximum: Option<Maximum>,
    pub multipath: Option<Multipath>,
    pub origin_as: Option<OriginAs>,
    pub redistribute_internal: Option<bool>,
    pub router_id: Option<String>,
    pub scan_time: Option<u32>,
    pub unsafe_ebgp_policy: Option<bool>,
}

/// `bgp ...` options valid inside a VRF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VrfBgpOptions {
    pub auto_policy_soft_reset: Option<Disable>,
    pub bestpath: Option<Bestpath>,
    pub default: Option<BgpDefault>,
    pub enforce_first_as: Option<Disable>,
    pub fast_external_fallover: Option<Disable>,
    pub log: Option<Log>,
    pub multipath: Option<Multipath>,
    pub redistribute_internal: Option<bool>,
    pub router_id: Option<String>,
    pub unsafe_ebgp_policy: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bestpath {
    pub aigp: Option<Ignore>,
    pub as_path: Option<BestpathAsPath>,
    pub compare_routerid: Option<bool>,
    pub cost_community: Option<Ignore>,
    pub med: Option<Med>,
    pub origin_as: Option<BestpathOriginAs>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ignore {
    pub ignore: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BestpathAsPath {
    pub ignore: Option<bool>,
    pub multipath_relax: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Med {
    pub always: Option<bool>,
    pub confed: Option<bool>,
    pub missing_as_worst: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BestpathOriginAs {
    pub r#use: Option<Validity>,
    pub allow: Option<Invalid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Validity {
    pub validity: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Invalid {
    pub invalid: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Confederation {
    #[serde(default, deserialize_with = "string_or_number")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BgpDefault {
    pub local_preference: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GracefulRestart {
    pub set: Option<bool>,
    pub graceful_reset: Option<bool>,
    pub restart_time: Option<u32>,
    pub stalepath_time: Option<u32>,
    pub purge_time: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Install {
    pub diversion: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Log {
    pub log_message: Option<Disable>,
    pub neighbor: Option<LogNeighbor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogNeighbor {
    pub changes: Option<LogChanges>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogChanges {
    pub detail: Option<bool>,
    pub disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Maximum {
    pub neighbor: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Multipath {
    pub as_path: Option<MultipathAsPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultipathAsPath {
    pub ignore: Option<Onwards>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Onwards {
    pub onwards: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OriginAs {
    pub validation: Option<OriginAsValidation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OriginAsValidation {
    pub disable: Option<bool>,
    pub signal: Option<Signal>,
    pub time: Option<ValidationTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Signal {
    pub ibgp: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationTime {
    pub time_off: Option<bool>,
    pub time_in_second: Option<u32>,
}

// ============================================================================
// Router-level blocks
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ibgp {
    pub policy: Option<IbgpPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IbgpPolicy {
    pub out: Option<IbgpPolicyOut>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IbgpPolicyOut {
    pub enforce_modifications: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Nsr {
    pub set: Option<bool>,
    pub disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Update {
    pub r#in: Option<UpdateIn>,
    pub limit: Option<u32>,
    pub out: Option<UpdateOut>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateIn {
    pub error_handling: Option<ErrorHandling>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorHandling {
    pub basic: Option<ErrorHandlingBasic>,
    pub extended: Option<ErrorHandlingExtended>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorHandlingBasic {
    pub ebgp: Option<Disable>,
    pub ibgp: Option<Disable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorHandlingExtended {
    pub ebgp: Option<bool>,
    pub ibgp: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateOut {
    pub logging: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rpki {
    pub servers: Option<Vec<RpkiServer>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RpkiServer {
    pub name: Option<String>,
    pub password: Option<String>,
    pub purge_time: Option<u32>,
    pub refresh_time: Option<RpkiTime>,
    pub response_time: Option<RpkiTime>,
    pub shutdown: Option<bool>,
    pub transport: Option<RpkiTransport>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RpkiTime {
    pub value: Option<u32>,
    pub time_off: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RpkiTransport {
    pub ssh: Option<Port>,
    pub tcp: Option<Port>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Port {
    pub port: Option<u32>,
}

// ============================================================================
// Neighbors and VRFs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Neighbor {
    pub neighbor: Option<String>,
    pub advertisement_interval: Option<u32>,
    pub bfd: Option<NeighborBfd>,
    pub bmp_activate: Option<BmpActivate>,
    pub capability: Option<Capability>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cluster_id: Option<String>,
    pub description: Option<String>,
    pub dmz_link_bandwidth: Option<Inheritable>,
    pub dscp: Option<String>,
    pub ebgp_multihop: Option<EbgpMultihop>,
    pub egress_engineering: Option<Inheritable>,
    pub enforce_first_as: Option<Disable>,
    pub graceful_restart: Option<NeighborGracefulRestart>,
    pub ignore_connected_check: Option<Inheritable>,
    pub keychain: Option<Keychain>,
    pub local_as: Option<LocalAs>,
    pub origin_as: Option<NeighborOriginAs>,
    pub password: Option<Password>,
    pub receive_buffer_size: Option<u32>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub remote_as: Option<String>,
    pub send_buffer_size: Option<u32>,
    pub session_open_mode: Option<SessionOpenMode>,
    pub shutdown: Option<Inheritable>,
    pub tcp: Option<Tcp>,
    pub timers: Option<Timers>,
    pub ttl_security: Option<Inheritable>,
    pub update_source: Option<String>,
    pub r#use: Option<Use>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeighborBfd {
    pub fast_detect: Option<FastDetect>,
    pub minimum_interval: Option<u32>,
    pub multiplier: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FastDetect {
    pub set: Option<bool>,
    pub strict_mode: Option<bool>,
    pub disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BmpActivate {
    pub server: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capability {
    pub suppress: Option<CapabilitySuppress>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilitySuppress {
    pub four_byte_as: Option<Inheritable>,
    pub all: Option<Inheritable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EbgpMultihop {
    pub value: Option<u32>,
    pub mpls: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeighborGracefulRestart {
    pub restart_time: Option<u32>,
    pub stalepath_time: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Keychain {
    pub name: Option<String>,
    pub inheritance_disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalAs {
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: Option<String>,
    pub inheritance_disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeighborOriginAs {
    pub validation: Option<Disable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Password {
    pub encrypted: Option<String>,
    pub inheritance_disable: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionOpenMode {
    ActiveOnly,
    Both,
    PassiveOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tcp {
    pub mss: Option<TcpMss>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TcpMss {
    pub value: Option<u32>,
    pub inheritance_disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Use {
    pub neighbor_group: Option<String>,
    pub session_group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rd {
    pub auto: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vrf {
    pub vrf: Option<String>,
    pub bfd: Option<Bfd>,
    pub bgp: Option<VrfBgpOptions>,
    pub default_information: Option<DefaultInformation>,
    pub default_metric: Option<u32>,
    pub mvpn: Option<bool>,
    pub neighbors: Option<Vec<Neighbor>>,
    pub rd: Option<Rd>,
    pub socket: Option<Socket>,
    pub timers: Option<Timers>,
}
