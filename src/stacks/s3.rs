//! S3 destination stack.

use tracing::debug;

use super::{bucket_name, provider, S3_STACK_NAME};
use crate::config::Settings;
use crate::error::Result;
use crate::log_format::log_format;
use crate::plan::Stack;
use crate::resources::{
    DestinationOptions, FileFormat, FlowLog, LifecycleRule, S3Bucket,
    S3BucketLifecycleConfiguration, S3BucketPublicAccessBlock, S3BucketVersioning, TrafficType,
    VersioningStatus,
};

/// Days before delivered log objects are deleted.
pub const EXPIRATION_DAYS: u32 = 2;

/// Id of the single lifecycle rule.
pub const LIFECYCLE_RULE_ID: &str = "deleting-old-logs";

/// `Name` tag of the flow log.
pub const FLOW_LOG_NAME_TAG: &str = "all-events-to-s3";

/// Build the `vpc-flowlogs-s3` stack.
pub fn build(settings: &Settings) -> Result<Stack> {
    settings.validate()?;

    let mut stack = Stack::new(S3_STACK_NAME, provider(settings))?;

    let bucket = stack.add_resource("bucket", S3Bucket::new(bucket_name(&settings.vpc_id)))?;

    stack.add_resource(
        "public_access_block",
        S3BucketPublicAccessBlock::fully_blocked(bucket.id()),
    )?;
    stack.add_resource(
        "versioning",
        S3BucketVersioning::new(bucket.id(), VersioningStatus::Disabled),
    )?;
    stack.add_resource(
        "lifecycle",
        S3BucketLifecycleConfiguration::new(
            bucket.id(),
            vec![LifecycleRule::expire_after(LIFECYCLE_RULE_ID, EXPIRATION_DAYS)],
        ),
    )?;
    stack.add_output("bucket_output", bucket.arn())?;

    let flow_log = FlowLog::to_s3(settings.vpc_id.as_str(), bucket.arn())
        .with_log_format(log_format())
        .with_traffic_type(TrafficType::All)
        .with_destination_options(DestinationOptions {
            file_format: FileFormat::PlainText,
            per_hour_partition: true,
        })
        .with_tag("Name", FLOW_LOG_NAME_TAG);
    let flow_log = stack.add_resource("flow-log-s3", flow_log)?;
    stack.add_output("flowlog_s3_output", flow_log.arn())?;

    debug!(
        stack = S3_STACK_NAME,
        resources = stack.resource_count(),
        "Built S3 destination stack"
    );
    Ok(stack)
}
