//! Error types for flowlog-stacks.
//!
//! This module defines the error types used throughout the crate. Provisioning
//! failures (credentials, name collisions, quotas) are reported by Terraform at
//! apply time; the errors here cover what can be checked while the plan is
//! being assembled: settings, graph wiring, and policy documents.

use std::path::PathBuf;
use thiserror::Error;

use crate::plan::graph::GraphError;

/// Result type alias for flowlog-stacks operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for flowlog-stacks.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A required setting is missing or empty.
    #[error("Missing required setting '{0}'")]
    MissingSetting(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// Error loading a settings file.
    #[error("Failed to load settings from '{path}': {message}")]
    ConfigLoad {
        /// Path to the settings file
        path: PathBuf,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Graph Errors
    // ========================================================================
    /// A logical id was registered twice in the same stack.
    #[error("Resource '{address}' is already declared in stack '{stack}'")]
    DuplicateResource {
        /// Stack name
        stack: String,
        /// Resource address
        address: String,
    },

    /// A property references a resource that is not part of the stack.
    #[error("Resource '{from}' references '{target}', which is not declared in stack '{stack}'")]
    UnknownReference {
        /// Stack name
        stack: String,
        /// Referencing resource or output
        from: String,
        /// Missing target address
        target: String,
    },

    /// An output name was registered twice in the same stack.
    #[error("Output '{name}' is already declared in stack '{stack}'")]
    DuplicateOutput {
        /// Stack name
        stack: String,
        /// Output name
        name: String,
    },

    /// Two stacks share a name within one app.
    #[error("Stack '{0}' is already part of the app")]
    DuplicateStack(String),

    /// Stack not found in the app.
    #[error("Stack '{0}' not found")]
    StackNotFound(String),

    /// Invalid stack, resource, or output identifier.
    #[error("Invalid identifier '{0}': must start with a letter or underscore and contain only letters, digits, '_' or '-'")]
    InvalidIdentifier(String),

    /// Dependency graph error.
    #[error(transparent)]
    Graph(#[from] GraphError),

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// A resource's properties are inconsistent.
    #[error("Invalid resource '{resource}': {message}")]
    InvalidResource {
        /// Resource type or address
        resource: String,
        /// Error message
        message: String,
    },

    /// IAM policy document failed validation.
    #[error("Invalid policy document: {0}")]
    InvalidPolicy(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// Writing synthesized output failed.
    #[error("Failed to write '{path}': {source}")]
    SynthWrite {
        /// Destination path
        path: PathBuf,
        /// Source error
        #[source]
        source: std::io::Error,
    },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Creates a new invalid config error.
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a new settings load error.
    pub fn config_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new invalid resource error.
    pub fn invalid_resource(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResource {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error comes from settings rather than graph wiring.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::MissingSetting(_)
                | Error::InvalidConfig { .. }
                | Error::ConfigLoad { .. }
                | Error::YamlParse(_)
                | Error::TomlParse(_)
        )
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            e if e.is_config_error() => 2,
            Error::DuplicateResource { .. }
            | Error::UnknownReference { .. }
            | Error::DuplicateOutput { .. }
            | Error::DuplicateStack(_)
            | Error::StackNotFound(_)
            | Error::InvalidIdentifier(_)
            | Error::Graph(_)
            | Error::InvalidResource { .. }
            | Error::InvalidPolicy(_) => 3,
            Error::SynthWrite { .. } => 4,
            _ => 1,
        }
    }
}
