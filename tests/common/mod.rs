//! Shared test utilities and fixtures for the flowlog-stacks test suite.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use flowlog_stacks::config::Settings;
use flowlog_stacks::plan::{ResourceNode, Stack};
use serde_json::Value;

/// VPC id used throughout the suite.
pub const VPC_ID: &str = "vpc-0abc123";

/// Settings for [`VPC_ID`] with two tags.
pub fn sample_settings() -> Settings {
    Settings::new(
        VPC_ID,
        BTreeMap::from([
            ("project".to_string(), "flowlogs".to_string()),
            ("team".to_string(), "network".to_string()),
        ]),
    )
}

/// Look up a resource, panicking with the stack's addresses when missing.
pub fn resource<'a>(stack: &'a Stack, resource_type: &str, id: &str) -> &'a ResourceNode {
    stack.resource(resource_type, id).unwrap_or_else(|| {
        let known: Vec<String> = stack.resources().map(|n| n.address().to_string()).collect();
        panic!("{resource_type}.{id} not in {known:?}")
    })
}

/// Parse a property holding a JSON document (IAM policies).
pub fn json_property(node: &ResourceNode, name: &str) -> Value {
    let raw = node
        .property(name)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("{} has no string property {name}", node.address()));
    serde_json::from_str(raw).expect("property is not valid JSON")
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_json::from_str(&content).expect("file is not valid JSON")
}
