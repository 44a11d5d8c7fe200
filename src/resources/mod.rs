//! Typed AWS resource declarations.
//!
//! Each struct mirrors the arguments of one Terraform `aws` provider resource
//! and serializes to the attribute map Terraform expects. Values that point at
//! other resources are [`Expr`](crate::expr::Expr)s holding typed references.
//!
//! ## Available Resources
//!
//! - [`S3Bucket`], [`S3BucketPublicAccessBlock`], [`S3BucketVersioning`],
//!   [`S3BucketLifecycleConfiguration`]: log bucket and its policies
//! - [`CloudwatchLogGroup`]: log group destination
//! - [`IamRole`], [`IamRolePolicy`]: delivery role for log group destinations
//! - [`FlowLog`]: the flow log itself
//! - [`AwsProvider`]: provider block shared by every resource in a stack

pub mod cloudwatch;
pub mod flow_log;
pub mod iam;
pub mod provider;
pub mod s3;

use serde::Serialize;

use crate::error::Result;
use crate::expr::Reference;

pub use cloudwatch::CloudwatchLogGroup;
pub use flow_log::{DestinationOptions, FileFormat, FlowLog, LogDestinationType, TrafficType};
pub use iam::{IamRole, IamRolePolicy};
pub use provider::{AwsProvider, DefaultTags};
pub use s3::{
    Expiration, LifecycleRule, RuleStatus, S3Bucket, S3BucketLifecycleConfiguration,
    S3BucketPublicAccessBlock, S3BucketVersioning, VersioningConfiguration, VersioningStatus,
};

/// A resource that can be declared in a [`Stack`](crate::plan::Stack).
pub trait Resource: Serialize {
    /// Terraform resource type, e.g. `aws_s3_bucket`.
    const TYPE: &'static str;

    /// References to other resources held in this resource's properties.
    fn references(&self) -> Vec<&Reference>;

    /// Checks property combinations Terraform would reject.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
