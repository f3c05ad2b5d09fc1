//! Network resource modules
//!
//! A resource module manages one slice of a device configuration (the
//! interfaces, the BGP instance, ...) declaratively. The caller states the
//! desired tree and a state policy; the module parses the device's running
//! configuration into the same shape and computes the ordered CLI commands
//! that close the gap.
//!
//! # Architecture
//!
//! ```text
//!  running-config text                         want (caller tree)
//!          |                                          |
//!          v                                          v
//!  +---------------+   have    +------------+   +------------+
//!  |  Text Parser  |---------->| Normalizer |<--| Validation |
//!  | (rule table)  |           +------------+   |  (argspec) |
//!  +---------------+                 |          +------------+
//!                                    v
//!                         +---------------------+
//!                         | Reconciliation      |
//!                         | (state policy)      |--> ordered commands
//!                         +---------------------+
//!                                    |
//!                         +---------------------+
//!                         | Command Renderer    |
//!                         | (same rule table)   |
//!                         +---------------------+
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use netresource::modules::network::iosxr::BgpGlobal;
//! use netresource::modules::network::{NetworkResource, State};
//!
//! let have = BgpGlobal.parse_facts(running_config)?;
//! ```
//!
//! # Supported Platforms
//!
//! - **Cisco IOS-XR**: `iosxr_interfaces`, `iosxr_bgp_global`,
//!   `iosxr_bgp_neighbor_address_family`

pub mod common;
pub mod iosxr;
pub mod normalize;
pub mod parser;
pub mod resource;
pub mod template;

pub use common::{
    clean_config_output, dict_merge, get_from_dict, remove_empties, CapturedConfig,
    NetworkDeviceConnection, State,
};
pub use normalize::{dict_to_list, list_to_dict, CollectionSpec, Identity};
pub use resource::{pair_entries, NetworkResource, Reconciler, ResourceModule, ResourceParams};
pub use template::{NetworkTemplate, ParserRule, Setval};

use crate::modules::ModuleRegistry;
use std::sync::Arc;

/// Register every network resource module with the registry
pub fn register_network_modules(registry: &mut ModuleRegistry) {
    for resource in iosxr::resources() {
        registry.register(Arc::new(ResourceModule::new(resource)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register() {
        let mut registry = ModuleRegistry::new();
        register_network_modules(&mut registry);
        assert!(registry.contains("iosxr_interfaces"));
        assert!(registry.contains("iosxr_bgp_neighbor_address_family"));
        assert_eq!(registry.names().len(), 3);
    }
}
