//! # flowlog-stacks - VPC Flow Log Stacks for Terraform
//!
//! flowlog-stacks declares two alternative ways of capturing the flow logs of
//! a VPC and synthesizes them to Terraform JSON. Nothing is provisioned here:
//! the synthesized documents are handed to `terraform plan`/`apply`.
//!
//! ## Core Concepts
//!
//! - **Settings**: VPC id, region and tags every resource is derived from
//! - **Resources**: typed value objects for each Terraform resource
//! - **Stacks**: a provider plus resources and named outputs
//! - **Dependency graph**: references and `depends_on` edges between resources
//! - **Synthesis**: rendering the app to `cdk.tf.json` files plus a manifest
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
//! │                     Settings (file + env + flags)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!          ┌─────────────────────────┴─────────────────────────┐
//!          ▼                                                   ▼
//! ┌─────────────────────┐                           ┌─────────────────────┐
//! │   vpc-flowlogs-s3   │                           │vpc-flowlogs-loggroup│
//! │ (bucket, flow log)  │                           │ (log group, role,   │
//! │                     │                           │  policy, flow log)  │
//! └─────────────────────┘                           └─────────────────────┘
//!          │                                                   │
//!          └─────────────────────────┬─────────────────────────┘
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 Synthesis (cdktf.out/stacks/*/cdk.tf.json)           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use flowlog_stacks::prelude::*;
//! use std::collections::BTreeMap;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let tags = BTreeMap::from([("team".to_string(), "network".to_string())]);
//!     let settings = Settings::new("vpc-0abc123", tags);
//!
//!     let app = build_app(&settings)?;
//!     let manifest = app.write(Path::new("cdktf.out"))?;
//!     println!("{} stacks written", manifest.stacks.len());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    // Error handling
    pub use crate::error::{Error, Result};

    // Settings
    pub use crate::config::Settings;

    // Plan assembly
    pub use crate::plan::{App, Manifest, ResourceGraph, ResourceRef, Stack};

    // Resources
    pub use crate::resources::{AwsProvider, FlowLog, Resource, TrafficType};

    // Stacks
    pub use crate::stacks::{build_app, LOG_GROUP_STACK_NAME, S3_STACK_NAME};

    // Field format
    pub use crate::log_format::{escaped_log_format, log_format, FIELD_NAMES};
}

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result aliases.
///
/// This module provides the main [`Error`](error::Error) enum covering settings,
/// graph wiring, policy validation, serialization and IO failures.
pub mod error;

/// Settings loading, merging and validation.
pub mod config;

/// Terraform expressions: literals, references and interpolation.
pub mod expr;

/// The flow log record format.
pub mod log_format;

// ============================================================================
// Resource Model
// ============================================================================

/// IAM policy documents.
pub mod policy;

/// Typed Terraform resources and the AWS provider block.
pub mod resources;

// ============================================================================
// Plan Assembly
// ============================================================================

/// Stacks, dependency graphs and synthesis.
///
/// A [`Stack`](plan::Stack) validates each resource as it is declared and
/// records its dependencies; an [`App`](plan::App) synthesizes stacks to
/// Terraform JSON.
pub mod plan;

/// The S3 and CloudWatch log group flow-log stacks.
pub mod stacks;
