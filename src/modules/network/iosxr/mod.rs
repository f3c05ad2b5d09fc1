//! Cisco IOS-XR resource modules
//!
//! Each resource pairs a static rule table with its argspec types and the
//! state semantics of the resource:
//!
//! - `iosxr_interfaces`: physical interface attributes
//! - `iosxr_bgp_global`: the BGP router, its neighbors, VRFs and RPKI servers
//! - `iosxr_bgp_neighbor_address_family`: per-neighbor address families

pub mod bgp_global;
pub mod bgp_neighbor_address_family;
pub mod interfaces;

pub use bgp_global::BgpGlobal;
pub use bgp_neighbor_address_family::BgpNeighborAddressFamily;
pub use interfaces::Interfaces;

use super::common::remove_empties;
use super::resource::NetworkResource;
use crate::modules::{ModuleError, ModuleResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Every IOS-XR resource, in registration order.
pub fn resources() -> Vec<Arc<dyn NetworkResource>> {
    vec![
        Arc::new(Interfaces),
        Arc::new(BgpGlobal),
        Arc::new(BgpNeighborAddressFamily),
    ]
}

/// Round-trip a caller-form tree through its argspec type.
///
/// Unknown keys and mistyped values are rejected; unset options come back
/// pruned so that want and have carry the same shape and types.
pub(crate) fn validate_typed<T>(module: &str, config: &Value) -> ModuleResult<Value>
where
    T: DeserializeOwned + Serialize,
{
    let typed: T = serde_json::from_value(config.clone())
        .map_err(|e| ModuleError::InvalidParameter(format!("{}: invalid config: {}", module, e)))?;
    let value = serde_json::to_value(&typed)
        .map_err(|e| ModuleError::ExecutionFailed(format!("{}: {}", module, e)))?;
    Ok(remove_empties(&value))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

/// Accept either `"65000"` or `65000` for string-typed identifiers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        #[serde(default, deserialize_with = "string_or_number")]
        as_number: Option<String>,
        enabled: Option<bool>,
    }

    #[test]
    fn test_validate_typed() {
        assert_eq!(
            validate_typed::<Sample>("sample", &json!({"as_number": 65000})).unwrap(),
            json!({"as_number": "65000"})
        );
        assert!(validate_typed::<Sample>("sample", &json!({"bogus": 1})).is_err());
        assert!(validate_typed::<Sample>("sample", &json!({"enabled": "maybe"})).is_err());
    }

    #[test]
    fn test_resources_are_unique() {
        let names: Vec<&str> = resources().iter().map(|r| r.module_name()).collect();
        assert_eq!(
            names,
            vec![
                "iosxr_interfaces",
                "iosxr_bgp_global",
                "iosxr_bgp_neighbor_address_family"
            ]
        );
    }
}
