//! Error types for netresource.
//!
//! Module-level failures are [`ModuleError`]s. This module defines the
//! crate-level [`Error`] used by the library surface and the CLI, which wraps
//! them together with input, configuration and IO failures.

use crate::modules::ModuleError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for netresource operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for netresource.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Module Errors
    // ========================================================================
    /// Module not found.
    #[error("Module '{0}' not found")]
    ModuleNotFound(String),

    /// Module rejected its parameters or failed while running.
    #[error("Module '{module}' failed: {source}")]
    Module {
        /// Module name
        module: String,
        /// Underlying module error
        #[source]
        source: ModuleError,
    },

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// An input file could not be interpreted.
    #[error("Failed to load '{path}': {message}")]
    InputLoad {
        /// Path to the input file
        path: PathBuf,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps a module error with the name of the module that raised it.
    pub fn module(module: impl Into<String>, source: ModuleError) -> Self {
        Self::Module {
            module: module.into(),
            source,
        }
    }

    /// Creates a new input load error.
    pub fn input_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InputLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration value error.
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Module {
                source: ModuleError::InvalidParameter(_) | ModuleError::MissingParameter(_),
                ..
            } => 2,
            Error::Module {
                source: ModuleError::Unsupported(_),
                ..
            } => 3,
            Error::Module { .. } => 4,
            Error::ModuleNotFound(_) => 5,
            Error::InputLoad { .. } | Error::FileNotFound(_) => 6,
            Error::InvalidConfig { .. } => 7,
            Error::Io(_) => 1,
        }
    }
}
