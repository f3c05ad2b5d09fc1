//! Resource facts gathering for netresource
//!
//! Gathers the structured facts of several network resources from one device
//! connection. Each show command is sent at most once per gather.

use crate::error::{Error, Result};
use crate::modules::network::{iosxr, NetworkDeviceConnection, NetworkResource};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Facts gathered from a device, keyed by resource name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts {
    data: IndexMap<String, serde_json::Value>,
}

impl Facts {
    /// Create empty facts
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fact
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a fact
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get all facts
    pub fn all(&self) -> &IndexMap<String, serde_json::Value> {
        &self.data
    }

    /// Gather facts for the named resources, or for every known resource
    /// when `names` is empty.
    ///
    /// Names may be given with or without the platform prefix
    /// (`bgp_global` or `iosxr_bgp_global`).
    pub fn gather(connection: &dyn NetworkDeviceConnection, names: &[String]) -> Result<Self> {
        let selected = select_resources(names)?;
        let mut outputs: HashMap<&'static str, String> = HashMap::new();
        let mut facts = Self::new();

        for resource in selected {
            let command = resource.gather_command();
            if !outputs.contains_key(command) {
                debug!(device = %connection.identifier(), command, "sending show command");
                let text = connection
                    .get(command)
                    .map_err(|e| Error::module(resource.module_name(), e))?;
                outputs.insert(command, text);
            }
            let text = outputs.get(command).map(String::as_str).unwrap_or_default();
            let parsed = resource
                .parse_facts(text)
                .map_err(|e| Error::module(resource.module_name(), e))?;
            facts.set(resource.name(), parsed);
        }

        info!(
            device = %connection.identifier(),
            resources = facts.data.len(),
            "gathered facts"
        );
        Ok(facts)
    }
}

fn select_resources(names: &[String]) -> Result<Vec<Arc<dyn NetworkResource>>> {
    let available = iosxr::resources();
    if names.is_empty() {
        return Ok(available);
    }

    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|r| r.name() == name.as_str() || r.module_name() == name.as_str())
                .cloned()
                .ok_or_else(|| Error::ModuleNotFound(name.clone()))
        })
        .collect()
}
