//! # netresource - A Declarative Network Resource Engine
//!
//! netresource turns the running configuration of a network device into
//! structured facts and computes the ordered CLI commands that move the
//! device to a desired configuration under a chosen state policy.
//!
//! ## Core Concepts
//!
//! - **Resources**: one slice of device configuration (interfaces, the BGP
//!   instance, per-neighbor address families)
//! - **Rule tables**: bidirectional pattern rules that parse CLI lines into
//!   trees and render trees back into CLI lines
//! - **States**: the policy for reconciling want with have (merged,
//!   replaced, overridden, deleted, purged) plus the non-config states
//!   (gathered, rendered, parsed)
//! - **Modules**: every resource is exposed through the [`modules::Module`]
//!   trait and looked up in the [`modules::ModuleRegistry`]
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           CLI Interface                              │
//! │                    (clap-based command parsing)                      │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Module Registry                              │
//! │                 (one ResourceModule per resource)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!          ┌─────────────────────────┼─────────────────────────┐
//!          ▼                         ▼                         ▼
//! ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────────┐
//! │   Text Parser   │   │   Reconciliation    │   │   Command Renderer  │
//! │  (rule tables)  │   │  (state policies)   │   │   (minijinja)       │
//! └─────────────────┘   └─────────────────────┘   └─────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Device Connection                               │
//! │           (captured running-config or a live transport)              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use netresource::prelude::*;
//! use std::sync::Arc;
//!
//! let device = CapturedConfig::from_file("xr1.cfg")?;
//! let registry = ModuleRegistry::with_builtins();
//! let context = ModuleContext::new()
//!     .with_check_mode(true)
//!     .with_connection(Arc::new(device));
//!
//! let mut params = ModuleParams::new();
//! params.insert("config".into(), serde_json::json!({"as_number": "65536"}));
//! params.insert("state".into(), serde_json::json!("merged"));
//!
//! let result = registry.execute("iosxr_bgp_global", &params, &context)?;
//! println!("{:?}", result.data["commands"]);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    // Error handling
    pub use crate::error::{Error, Result};

    // Facts
    pub use crate::facts::Facts;

    // Module system
    pub use crate::modules::{
        Module, ModuleContext, ModuleError, ModuleOutput, ModuleParams, ModuleRegistry,
        ModuleResult,
    };

    // Network resources
    pub use crate::modules::network::{
        CapturedConfig, NetworkDeviceConnection, NetworkResource, ResourceModule, State,
    };
}

/// Error types and result aliases for netresource operations.
///
/// The crate-level [`Error`](error::Error) wraps module failures together
/// with configuration, IO and serialization errors, and maps each to a CLI
/// exit code.
pub mod error;

/// Multi-resource facts gathering from one device connection.
pub mod facts;

/// Resource modules, the module trait and the registry.
///
/// Network resources live under [`modules::network`]: the shared rule
/// engine (template, parser, normalizer, reconciler) and the IOS-XR
/// resources built on it.
pub mod modules;

/// Configuration management for netresource behavior.
///
/// Handles loading and merging configuration from multiple sources:
/// environment variables, config files, and command-line arguments.
pub mod config;

pub use error::{Error, Result};

/// Returns the current version of netresource.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
