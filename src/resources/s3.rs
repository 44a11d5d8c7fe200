//! S3 bucket resources used as a flow-log destination.
//!
//! The bucket itself only carries a name; public access, versioning and
//! lifecycle are separate Terraform resources pointing at the bucket id.

use serde::Serialize;
use std::collections::HashSet;

use super::Resource;
use crate::error::{Error, Result};
use crate::expr::{Expr, Reference};

/// `aws_s3_bucket`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3Bucket {
    /// Globally unique bucket name
    pub bucket: Expr,
}

impl S3Bucket {
    /// A bucket with the given name.
    pub fn new(bucket: impl Into<Expr>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }
}

impl Resource for S3Bucket {
    const TYPE: &'static str = "aws_s3_bucket";

    fn references(&self) -> Vec<&Reference> {
        self.bucket.references().collect()
    }

    fn validate(&self) -> Result<()> {
        if let Some(name) = self.bucket.as_literal() {
            if !(3..=63).contains(&name.len()) {
                return Err(Error::invalid_resource(
                    Self::TYPE,
                    format!("bucket name '{name}' must be between 3 and 63 characters"),
                ));
            }
            if name.chars().any(|c| c.is_ascii_uppercase() || c == '_') {
                return Err(Error::invalid_resource(
                    Self::TYPE,
                    format!("bucket name '{name}' may not contain uppercase letters or '_'"),
                ));
            }
        }
        Ok(())
    }
}

/// `aws_s3_bucket_public_access_block`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3BucketPublicAccessBlock {
    /// Bucket id
    pub bucket: Expr,
    /// Reject requests that set public ACLs
    pub block_public_acls: bool,
    /// Reject bucket policies that grant public access
    pub block_public_policy: bool,
    /// Ignore existing public ACLs
    pub ignore_public_acls: bool,
    /// Restrict access to buckets with public policies
    pub restrict_public_buckets: bool,
}

impl S3BucketPublicAccessBlock {
    /// Blocks every form of public access.
    pub fn fully_blocked(bucket: impl Into<Expr>) -> Self {
        Self {
            bucket: bucket.into(),
            block_public_acls: true,
            block_public_policy: true,
            ignore_public_acls: true,
            restrict_public_buckets: true,
        }
    }

    /// True when all four flags are set.
    pub fn is_fully_blocked(&self) -> bool {
        self.block_public_acls
            && self.block_public_policy
            && self.ignore_public_acls
            && self.restrict_public_buckets
    }
}

impl Resource for S3BucketPublicAccessBlock {
    const TYPE: &'static str = "aws_s3_bucket_public_access_block";

    fn references(&self) -> Vec<&Reference> {
        self.bucket.references().collect()
    }
}

/// Bucket versioning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VersioningStatus {
    /// Keep every object version
    Enabled,
    /// Never versioned
    Disabled,
}

/// `versioning_configuration` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersioningConfiguration {
    /// Versioning state
    pub status: VersioningStatus,
}

/// `aws_s3_bucket_versioning`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3BucketVersioning {
    /// Bucket id
    pub bucket: Expr,
    /// Versioning settings
    pub versioning_configuration: VersioningConfiguration,
}

impl S3BucketVersioning {
    /// Versioning with an explicit status.
    pub fn new(bucket: impl Into<Expr>, status: VersioningStatus) -> Self {
        Self {
            bucket: bucket.into(),
            versioning_configuration: VersioningConfiguration { status },
        }
    }
}

impl Resource for S3BucketVersioning {
    const TYPE: &'static str = "aws_s3_bucket_versioning";

    fn references(&self) -> Vec<&Reference> {
        self.bucket.references().collect()
    }
}

/// Lifecycle rule state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleStatus {
    /// Rule is applied
    Enabled,
    /// Rule is kept but not applied
    Disabled,
}

/// `expiration` block of a lifecycle rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expiration {
    /// Days after creation before objects are deleted
    pub days: u32,
}

/// One lifecycle rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleRule {
    /// Rule id, unique per configuration
    pub id: String,
    /// Whether the rule is applied
    pub status: RuleStatus,
    /// Expiration action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<Expiration>,
}

impl LifecycleRule {
    /// An enabled rule deleting objects after `days`.
    pub fn expire_after(id: impl Into<String>, days: u32) -> Self {
        Self {
            id: id.into(),
            status: RuleStatus::Enabled,
            expiration: Some(Expiration { days }),
        }
    }
}

/// `aws_s3_bucket_lifecycle_configuration`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3BucketLifecycleConfiguration {
    /// Bucket id
    pub bucket: Expr,
    /// Rules, at least one
    pub rule: Vec<LifecycleRule>,
}

impl S3BucketLifecycleConfiguration {
    /// A configuration with the given rules.
    pub fn new(bucket: impl Into<Expr>, rule: Vec<LifecycleRule>) -> Self {
        Self {
            bucket: bucket.into(),
            rule,
        }
    }
}

impl Resource for S3BucketLifecycleConfiguration {
    const TYPE: &'static str = "aws_s3_bucket_lifecycle_configuration";

    fn references(&self) -> Vec<&Reference> {
        self.bucket.references().collect()
    }

    fn validate(&self) -> Result<()> {
        if self.rule.is_empty() {
            return Err(Error::invalid_resource(
                Self::TYPE,
                "at least one rule is required",
            ));
        }
        let mut seen = HashSet::new();
        for rule in &self.rule {
            if rule.id.is_empty() || !seen.insert(rule.id.as_str()) {
                return Err(Error::invalid_resource(
                    Self::TYPE,
                    format!("rule id '{}' is empty or duplicated", rule.id),
                ));
            }
            if rule.expiration.as_ref().is_some_and(|e| e.days == 0) {
                return Err(Error::invalid_resource(
                    Self::TYPE,
                    format!("rule '{}' must expire after at least one day", rule.id),
                ));
            }
        }
        Ok(())
    }
}
