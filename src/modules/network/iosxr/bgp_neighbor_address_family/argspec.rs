//! Typed configuration of the BGP neighbor address-family resource.

use crate::modules::network::iosxr::bgp_global::{Disable, Inheritable};
use crate::modules::network::iosxr::string_or_number;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BgpNeighborAddressFamilyConfig {
    #[serde(default, deserialize_with = "string_or_number")]
    pub as_number: Option<String>,
    pub neighbors: Option<Vec<Neighbor>>,
    pub vrfs: Option<Vec<Vrf>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vrf {
    pub vrf: Option<String>,
    pub neighbors: Option<Vec<Neighbor>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Neighbor {
    pub neighbor: Option<String>,
    pub address_family: Option<Vec<AddressFamily>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Afi {
    Ipv4,
    Ipv6,
    Vpnv4,
    Vpnv6,
    L2vpn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Safi {
    Unicast,
    Multicast,
    LabeledUnicast,
    Flowspec,
    Mdt,
    Mvpn,
    RtFilter,
    Tunnel,
    Evpn,
    VplsVpws,
}

/// One `address-family AFI SAFI` block of a neighbor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressFamily {
    pub afi: Option<Afi>,
    pub safi: Option<Safi>,
    pub allowas_in: Option<AllowasIn>,
    pub as_override: Option<Inheritable>,
    pub bestpath_origin_as_allow_invalid: Option<bool>,
    pub capability_orf_prefix: Option<OrfCapability>,
    pub default_originate: Option<DefaultOriginate>,
    pub long_lived_graceful_restart: Option<LongLivedGracefulRestart>,
    pub maximum_prefix: Option<MaximumPrefix>,
    pub multipath: Option<bool>,
    pub next_hop_self: Option<Inheritable>,
    pub next_hop_unchanged: Option<NextHopUnchanged>,
    pub orf_route_policy: Option<String>,
    pub origin_as: Option<OriginAs>,
    pub remove_private_as: Option<RemovePrivateAs>,
    pub route_policy: Option<RoutePolicy>,
    pub route_reflector_client: Option<Inheritable>,
    pub send_community_ebgp: Option<Inheritable>,
    pub send_community_gshut_ebgp: Option<Inheritable>,
    pub send_extended_community_ebgp: Option<Inheritable>,
    pub soft_reconfiguration: Option<SoftReconfiguration>,
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowasIn {
    pub set: Option<bool>,
    pub value: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrfCapability {
    Both,
    Send,
    Receive,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultOriginate {
    pub set: Option<bool>,
    pub route_policy: Option<String>,
    pub inheritance_disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LongLivedGracefulRestart {
    pub capable: Option<bool>,
    pub stale_time_send: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaximumPrefix {
    pub max_limit: Option<u32>,
    pub threshold_value: Option<u32>,
    pub restart: Option<u32>,
    pub warning_only: Option<bool>,
    pub discard_extra_paths: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NextHopUnchanged {
    pub set: Option<bool>,
    pub inheritance_disable: Option<bool>,
    pub multipath: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OriginAs {
    pub validation: Option<Disable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemovePrivateAs {
    pub set: Option<bool>,
    pub inbound: Option<bool>,
    pub entire_aspath: Option<bool>,
    pub inheritance_disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutePolicy {
    pub r#in: Option<String>,
    pub out: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoftReconfiguration {
    pub inbound_always: Option<bool>,
    pub inbound_inheritance_disable: Option<bool>,
}
