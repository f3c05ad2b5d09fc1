//! Shared test utilities and fixtures for the netresource test suite.
//!
//! This module provides:
//! - A captured IOS-XR running configuration fixture
//! - A recording device connection that keeps every pushed command
//! - Parameter builders and assertion helpers for ModuleOutput
//!
//! # Usage
//!
//! Include this module in your integration tests:
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::Value;

use netresource::modules::network::NetworkDeviceConnection;
use netresource::modules::{ModuleContext, ModuleOutput, ModuleParams, ModuleResult};

// ============================================================================
// Fixtures
// ============================================================================

/// A full `show running-config` of one router, including blocks no
/// resource manages.
pub const RUNNING_CONFIG: &str = "\
Building configuration...
!! IOS XR Configuration 7.3.2
hostname xr1
interface Loopback0
 description router id
!
interface GigabitEthernet0/0/0/0
 description uplink
 mtu 9000
!
route-policy PASS
  pass
end-policy
!
router bgp 65000
 bgp router-id 192.0.2.1
 address-family ipv4 unicast
 !
 neighbor 10.0.0.1
  remote-as 65001
  description peer one
  address-family ipv4 unicast
   route-policy PASS in
  !
 !
 vrf blue
  rd auto
  neighbor 10.1.1.1
   remote-as 65100
   address-family ipv4 unicast
    weight 100
   !
  !
 !
!
end
";

/// Two interface blocks, one with more fields than the other.
pub const TWO_INTERFACES: &str = "\
interface GigabitEthernet0/0/0/1
 description to core
 mtu 1514
!
interface GigabitEthernet0/0/0/2
 shutdown
!
";

// ============================================================================
// Recording Device
// ============================================================================

/// A device connection that answers show commands from a fixed running
/// configuration and records every command pushed to it.
#[derive(Debug)]
pub struct RecordingDevice {
    hostname: String,
    running: String,
    pushed: Mutex<Vec<Vec<String>>>,
    show_commands: Mutex<Vec<String>>,
}

impl RecordingDevice {
    pub fn new(hostname: &str, running: &str) -> Arc<Self> {
        Arc::new(Self {
            hostname: hostname.to_string(),
            running: running.to_string(),
            pushed: Mutex::new(Vec::new()),
            show_commands: Mutex::new(Vec::new()),
        })
    }

    /// Every batch pushed with `edit_config`, in order
    pub fn pushed(&self) -> Vec<Vec<String>> {
        self.pushed.lock().unwrap().clone()
    }

    /// Every show command received, in order
    pub fn show_commands(&self) -> Vec<String> {
        self.show_commands.lock().unwrap().clone()
    }
}

impl NetworkDeviceConnection for RecordingDevice {
    fn identifier(&self) -> String {
        self.hostname.clone()
    }

    fn get(&self, command: &str) -> ModuleResult<String> {
        self.show_commands.lock().unwrap().push(command.to_string());
        Ok(self.running.clone())
    }

    fn edit_config(&self, commands: &[String]) -> ModuleResult<()> {
        self.pushed.lock().unwrap().push(commands.to_vec());
        Ok(())
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Build module parameters from a config tree and a state
pub fn params(config: Option<Value>, state: &str) -> ModuleParams {
    let mut params = ModuleParams::new();
    if let Some(config) = config {
        params.insert("config".to_string(), config);
    }
    params.insert("state".to_string(), Value::String(state.to_string()));
    params
}

/// Build module parameters for the parsed state
pub fn parsed_params(running_config: &str) -> ModuleParams {
    let mut params = params(None, "parsed");
    params.insert(
        "running_config".to_string(),
        Value::String(running_config.to_string()),
    );
    params
}

/// A context connected to the given device
pub fn context_for(device: &Arc<RecordingDevice>, check_mode: bool) -> ModuleContext {
    ModuleContext::new()
        .with_check_mode(check_mode)
        .with_connection(Arc::clone(device) as Arc<dyn NetworkDeviceConnection>)
}

// ============================================================================
// Assertions
// ============================================================================

/// The `commands` (or `rendered`) list of a module output
pub fn commands_of(output: &ModuleOutput) -> Vec<String> {
    output
        .data
        .get("commands")
        .or_else(|| output.data.get("rendered"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|c| c.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Assert that every context line is followed by at least one command that
/// is not itself a context line.
pub fn assert_no_empty_contexts(commands: &[String], context_prefixes: &[&str]) {
    let is_context = |c: &str| context_prefixes.iter().any(|p| c.starts_with(p));
    for (i, command) in commands.iter().enumerate() {
        if is_context(command) {
            let has_child = commands[i + 1..].iter().any(|c| !is_context(c));
            assert!(
                has_child,
                "context '{}' has no child command in {:?}",
                command, commands
            );
        }
    }
}
