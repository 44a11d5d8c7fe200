//! The two flow-log destination stacks.
//!
//! Both stacks are built from the same [`Settings`] and share nothing but
//! the provider configuration and the flow-log record format:
//!
//! - [`s3`] delivers records into a locked-down bucket with a short
//!   expiration rule.
//! - [`log_group`] delivers records into a CloudWatch log group through an
//!   IAM role trusted by the flow-log service.

pub mod log_group;
pub mod s3;

use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::plan::App;
use crate::resources::AwsProvider;

/// Name of the S3 destination stack.
pub const S3_STACK_NAME: &str = "vpc-flowlogs-s3";

/// Name of the CloudWatch log group destination stack.
pub const LOG_GROUP_STACK_NAME: &str = "vpc-flowlogs-loggroup";

/// Names of every stack, in build order.
pub const STACK_NAMES: [&str; 2] = [S3_STACK_NAME, LOG_GROUP_STACK_NAME];

/// Provider shared by both stacks: region plus default tags.
pub fn provider(settings: &Settings) -> AwsProvider {
    AwsProvider::new(settings.region.clone())
        .with_default_tags(settings.tags.clone())
        .with_version(settings.provider_version.clone())
}

/// `vpc-flow-logs-<vpc_id>`
pub fn bucket_name(vpc_id: &str) -> String {
    format!("vpc-flow-logs-{vpc_id}")
}

/// `/vpcflowlogs/<vpc_id>`
pub fn log_group_name(vpc_id: &str) -> String {
    format!("/vpcflowlogs/{vpc_id}")
}

/// `allow-vpc-flow-log-<vpc_id>-to-log-group`
pub fn iam_role_name(vpc_id: &str) -> String {
    format!("allow-vpc-flow-log-{vpc_id}-to-log-group")
}

/// Build the app holding both stacks.
///
/// Settings are validated once up front so a missing VPC id or tag map is
/// reported before any resource is constructed.
pub fn build_app(settings: &Settings) -> Result<App> {
    settings.validate()?;

    let mut app = App::new();
    app.add_stack(s3::build(settings)?)?;
    app.add_stack(log_group::build(settings)?)?;

    info!(vpc_id = %settings.vpc_id, stacks = STACK_NAMES.len(), "Built app");
    Ok(app)
}
