//! CloudWatch log group destination stack.
//!
//! The flow log writes into the log group under a dedicated role. The role
//! trusts the flow-log service and carries one inline policy scoped to the
//! log group and its streams. The flow log references the role ARN and
//! waits explicitly for the inline policy, so Terraform never starts the
//! delivery before the role can actually write.

use tracing::debug;

use super::{iam_role_name, log_group_name, provider, LOG_GROUP_STACK_NAME};
use crate::config::Settings;
use crate::error::Result;
use crate::expr::Expr;
use crate::log_format::log_format;
use crate::plan::{ResourceRef, Stack};
use crate::policy::{PolicyDocument, Principal, Statement};
use crate::resources::{CloudwatchLogGroup, FlowLog, IamRole, IamRolePolicy, TrafficType};

/// Days events are kept in the log group.
pub const RETENTION_DAYS: u32 = 1;

/// Service principal allowed to assume the delivery role.
pub const FLOW_LOGS_SERVICE: &str = "vpc-flow-logs.amazonaws.com";

/// Name of the inline role policy.
pub const ROLE_POLICY_NAME: &str = "default_policy";

/// Actions the delivery role needs on the log group.
pub const LOG_ACTIONS: [&str; 5] = [
    "logs:CreateLogGroup",
    "logs:CreateLogStream",
    "logs:PutLogEvents",
    "logs:DescribeLogGroups",
    "logs:DescribeLogStreams",
];

/// `Name` tag of the flow log.
pub const FLOW_LOG_NAME_TAG: &str = "all-events-to-cloudwatch-log-groups";

/// Trust policy letting the flow-log service assume the role.
pub fn trust_policy() -> PolicyDocument {
    PolicyDocument::new(vec![Statement::allow()
        .action("sts:AssumeRole")
        .principal(Principal::service(FLOW_LOGS_SERVICE))])
}

/// Permissions on `log_group` and its streams only.
pub fn log_delivery_policy(log_group: &ResourceRef) -> PolicyDocument {
    PolicyDocument::new(vec![Statement::allow()
        .actions(LOG_ACTIONS)
        .resource(Expr::reference(log_group.arn()).concat(":*"))])
}

/// Build the `vpc-flowlogs-loggroup` stack.
pub fn build(settings: &Settings) -> Result<Stack> {
    settings.validate()?;

    let mut stack = Stack::new(LOG_GROUP_STACK_NAME, provider(settings))?;

    let log_group = stack.add_resource(
        "log-group-log-group",
        CloudwatchLogGroup::new(log_group_name(&settings.vpc_id), RETENTION_DAYS),
    )?;
    stack.add_output("log_group_output", log_group.arn())?;

    let role = stack.add_resource(
        "iam-role",
        IamRole::new(iam_role_name(&settings.vpc_id), trust_policy()),
    )?;
    let role_policy = stack.add_resource(
        "iam-role-policy",
        IamRolePolicy::new(ROLE_POLICY_NAME, role.id(), log_delivery_policy(&log_group)),
    )?;
    stack.add_output("iam_role_output", role.arn())?;

    let flow_log = FlowLog::to_log_group(settings.vpc_id.as_str(), log_group.arn(), role.arn())
        .with_traffic_type(TrafficType::All)
        .with_log_format(log_format())
        .with_tag("Name", FLOW_LOG_NAME_TAG);
    let flow_log =
        stack.add_resource_with_deps("flow-log-cloudwatch-log-group", flow_log, &[&role_policy])?;
    stack.add_output("flowlog_cloudwatch_output", flow_log.arn())?;

    debug!(
        stack = LOG_GROUP_STACK_NAME,
        resources = stack.resource_count(),
        "Built log group destination stack"
    );
    Ok(stack)
}
