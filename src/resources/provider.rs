//! AWS provider block.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::expr::serialize_literal_map;

/// Registry source of the AWS provider.
pub const PROVIDER_SOURCE: &str = "hashicorp/aws";

/// Default provider version constraint.
pub const DEFAULT_PROVIDER_VERSION: &str = "~> 5.0";

/// Default region for every stack.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Tags applied to every taggable resource of the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultTags {
    /// Tag map
    #[serde(serialize_with = "serialize_literal_map")]
    pub tags: BTreeMap<String, String>,
}

/// `provider "aws"` configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwsProvider {
    /// Region resources are created in
    pub region: String,
    /// Provider-wide tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_tags: Vec<DefaultTags>,
    /// Version constraint for `required_providers`
    #[serde(skip)]
    pub version: String,
}

impl AwsProvider {
    /// A provider for `region` without default tags.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            default_tags: Vec::new(),
            version: DEFAULT_PROVIDER_VERSION.to_string(),
        }
    }

    /// Apply `tags` to every resource.
    pub fn with_default_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.default_tags = vec![DefaultTags { tags }];
        self
    }

    /// Pin the provider version constraint.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

impl Default for AwsProvider {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}
