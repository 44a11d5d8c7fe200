//! Tests for the CloudWatch log group destination stack
//!
//! The interesting properties here are the IAM documents (trust and
//! permissions) and the ordering between the role, its policy and the flow
//! log that uses them.

mod common;

use common::*;
use flowlog_stacks::plan::DependencyKind;
use flowlog_stacks::stacks::{log_group, LOG_GROUP_STACK_NAME};
use pretty_assertions::assert_eq;
use serde_json::json;

const FLOW_LOG: &str = "aws_flow_log.flow-log-cloudwatch-log-group";
const ROLE: &str = "aws_iam_role.iam-role";
const ROLE_POLICY: &str = "aws_iam_role_policy.iam-role-policy";
const LOG_GROUP: &str = "aws_cloudwatch_log_group.log-group-log-group";

#[test]
fn test_log_group_named_after_vpc() {
    let stack = log_group::build(&sample_settings()).unwrap();
    assert_eq!(stack.name(), LOG_GROUP_STACK_NAME);

    let lg = resource(&stack, "aws_cloudwatch_log_group", "log-group-log-group");
    assert_eq!(
        lg.properties(),
        &json!({"name": "/vpcflowlogs/vpc-0abc123", "retention_in_days": 1})
    );
}

#[test]
fn test_trust_policy_document() {
    let stack = log_group::build(&sample_settings()).unwrap();
    let role = resource(&stack, "aws_iam_role", "iam-role");
    assert_eq!(
        role.property("name"),
        Some(&json!("allow-vpc-flow-log-vpc-0abc123-to-log-group"))
    );
    assert_eq!(
        json_property(role, "assume_role_policy"),
        json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": {"Service": "vpc-flow-logs.amazonaws.com"},
                "Action": "sts:AssumeRole",
            }],
        })
    );
}

#[test]
fn test_permission_policy_document() {
    let stack = log_group::build(&sample_settings()).unwrap();
    let policy = resource(&stack, "aws_iam_role_policy", "iam-role-policy");
    assert_eq!(policy.property("name"), Some(&json!("default_policy")));
    assert_eq!(policy.property("role"), Some(&json!("${aws_iam_role.iam-role.id}")));
    assert_eq!(
        json_property(policy, "policy"),
        json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Action": [
                    "logs:CreateLogGroup",
                    "logs:CreateLogStream",
                    "logs:PutLogEvents",
                    "logs:DescribeLogGroups",
                    "logs:DescribeLogStreams",
                ],
                "Resource": "${aws_cloudwatch_log_group.log-group-log-group.arn}:*",
            }],
        })
    );
}

#[test]
fn test_permission_resource_never_bare_wildcard() {
    let stack = log_group::build(&sample_settings()).unwrap();
    let policy = json_property(
        resource(&stack, "aws_iam_role_policy", "iam-role-policy"),
        "policy",
    );
    let resource = policy["Statement"][0]["Resource"].as_str().unwrap();
    assert_ne!(resource, "*");
    assert!(resource.ends_with(":*"));
    assert!(resource.starts_with("${aws_cloudwatch_log_group."));
}

#[test]
fn test_flow_log_document() {
    let stack = log_group::build(&sample_settings()).unwrap();
    let doc = stack.to_terraform_json().unwrap();
    let flow_log = &doc["resource"]["aws_flow_log"]["flow-log-cloudwatch-log-group"];

    assert_eq!(flow_log["vpc_id"], json!("vpc-0abc123"));
    assert_eq!(flow_log["traffic_type"], json!("ALL"));
    assert_eq!(
        flow_log["log_destination"],
        json!("${aws_cloudwatch_log_group.log-group-log-group.arn}")
    );
    assert_eq!(flow_log["iam_role_arn"], json!("${aws_iam_role.iam-role.arn}"));
    assert_eq!(flow_log["depends_on"], json!([ROLE_POLICY]));
    assert_eq!(
        flow_log["tags"],
        json!({"Name": "all-events-to-cloudwatch-log-groups"})
    );
    assert!(flow_log.get("destination_options").is_none());
}

#[test]
fn test_flow_log_created_after_role_and_policy() {
    let stack = log_group::build(&sample_settings()).unwrap();
    let graph = stack.dependency_graph().unwrap();
    assert!(!graph.has_cycles());

    let order = graph.get_execution_order().unwrap();
    let position = |address: &str| order.iter().position(|a| a == address).unwrap();
    assert!(position(LOG_GROUP) < position(ROLE_POLICY));
    assert!(position(ROLE) < position(ROLE_POLICY));
    assert!(position(ROLE_POLICY) < position(FLOW_LOG));

    let deps = graph.get_dependencies(FLOW_LOG);
    assert_eq!(deps, vec![LOG_GROUP, ROLE, ROLE_POLICY]);
}

#[test]
fn test_flow_log_direct_dependencies() {
    let stack = log_group::build(&sample_settings()).unwrap();
    let graph = stack.dependency_graph().unwrap();
    let direct = graph.get_direct_dependencies(FLOW_LOG);

    let summary: Vec<(&str, DependencyKind, Option<&str>)> = direct
        .iter()
        .map(|d| (d.from.as_str(), d.kind, d.attribute.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (LOG_GROUP, DependencyKind::Reference, Some("arn")),
            (ROLE, DependencyKind::Reference, Some("arn")),
            (ROLE_POLICY, DependencyKind::Explicit, None),
        ]
    );
}

#[test]
fn test_outputs() {
    let stack = log_group::build(&sample_settings()).unwrap();
    let doc = stack.to_terraform_json().unwrap();
    assert_eq!(
        doc["output"],
        json!({
            "log_group_output": {"value": "${aws_cloudwatch_log_group.log-group-log-group.arn}"},
            "iam_role_output": {"value": "${aws_iam_role.iam-role.arn}"},
            "flowlog_cloudwatch_output": {"value": "${aws_flow_log.flow-log-cloudwatch-log-group.arn}"},
        })
    );
}

#[test]
fn test_missing_tags_rejected() {
    let mut settings = sample_settings();
    settings.tags.clear();
    assert!(log_group::build(&settings).is_err());
}
