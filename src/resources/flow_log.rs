//! VPC flow log.

use serde::Serialize;
use std::collections::BTreeMap;

use super::Resource;
use crate::error::{Error, Result};
use crate::expr::{serialize_literal_map, Expr, Reference};

/// Which traffic is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrafficType {
    /// Accepted traffic only
    Accept,
    /// Rejected traffic only
    Reject,
    /// Accepted, rejected and everything else
    All,
}

/// Where records are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogDestinationType {
    /// CloudWatch Logs log group (needs a delivery role)
    CloudWatchLogs,
    /// S3 bucket
    S3,
}

/// Object format for S3 deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileFormat {
    /// Text lines in the custom log format
    PlainText,
    /// Apache Parquet
    Parquet,
}

/// `destination_options` block, only valid for S3 destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationOptions {
    /// Object format
    pub file_format: FileFormat,
    /// Partition objects per hour instead of per day
    pub per_hour_partition: bool,
}

/// `aws_flow_log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowLog {
    /// VPC to capture
    pub vpc_id: Expr,
    /// Captured traffic
    pub traffic_type: TrafficType,
    /// Destination ARN
    pub log_destination: Expr,
    /// Destination kind; Terraform defaults to CloudWatch Logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_destination_type: Option<LogDestinationType>,
    /// Custom record format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<Expr>,
    /// Delivery role, required for CloudWatch Logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_role_arn: Option<Expr>,
    /// S3 object options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_options: Option<DestinationOptions>,
    /// Resource tags
    #[serde(
        skip_serializing_if = "BTreeMap::is_empty",
        serialize_with = "serialize_literal_map"
    )]
    pub tags: BTreeMap<String, String>,
}

impl FlowLog {
    /// A flow log delivering straight into an S3 bucket.
    pub fn to_s3(vpc_id: impl Into<Expr>, bucket_arn: impl Into<Expr>) -> Self {
        Self {
            log_destination_type: Some(LogDestinationType::S3),
            ..Self::base(vpc_id.into(), bucket_arn.into())
        }
    }

    /// A flow log delivering into a log group through `role_arn`.
    pub fn to_log_group(
        vpc_id: impl Into<Expr>,
        log_group_arn: impl Into<Expr>,
        role_arn: impl Into<Expr>,
    ) -> Self {
        Self {
            iam_role_arn: Some(role_arn.into()),
            ..Self::base(vpc_id.into(), log_group_arn.into())
        }
    }

    fn base(vpc_id: Expr, log_destination: Expr) -> Self {
        Self {
            vpc_id,
            traffic_type: TrafficType::All,
            log_destination,
            log_destination_type: None,
            log_format: None,
            iam_role_arn: None,
            destination_options: None,
            tags: BTreeMap::new(),
        }
    }

    /// Set the captured traffic.
    pub fn with_traffic_type(mut self, traffic_type: TrafficType) -> Self {
        self.traffic_type = traffic_type;
        self
    }

    /// Set the custom record format.
    pub fn with_log_format(mut self, format: impl Into<String>) -> Self {
        self.log_format = Some(Expr::literal(format));
        self
    }

    /// Set S3 object options.
    pub fn with_destination_options(mut self, options: DestinationOptions) -> Self {
        self.destination_options = Some(options);
        self
    }

    /// Add a resource tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Effective destination, applying Terraform's default.
    pub fn destination_type(&self) -> LogDestinationType {
        self.log_destination_type
            .unwrap_or(LogDestinationType::CloudWatchLogs)
    }
}

impl Resource for FlowLog {
    const TYPE: &'static str = "aws_flow_log";

    fn references(&self) -> Vec<&Reference> {
        let mut refs: Vec<&Reference> = self.vpc_id.references().collect();
        refs.extend(self.log_destination.references());
        for expr in [&self.log_format, &self.iam_role_arn].into_iter().flatten() {
            refs.extend(expr.references());
        }
        refs
    }

    fn validate(&self) -> Result<()> {
        if self.vpc_id.is_empty() {
            return Err(Error::invalid_resource(Self::TYPE, "vpc_id is empty"));
        }
        if self.log_destination.is_empty() {
            return Err(Error::invalid_resource(Self::TYPE, "log_destination is empty"));
        }
        let destination = self.destination_type();
        if destination == LogDestinationType::CloudWatchLogs && self.iam_role_arn.is_none() {
            return Err(Error::invalid_resource(
                Self::TYPE,
                "CloudWatch Logs destinations need an iam_role_arn",
            ));
        }
        if destination != LogDestinationType::S3 && self.destination_options.is_some() {
            return Err(Error::invalid_resource(
                Self::TYPE,
                "destination_options only apply to S3 destinations",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ResourceAddress;
    use serde_json::json;

    fn arn(resource_type: &str, id: &str) -> Reference {
        ResourceAddress::new(resource_type, id).unwrap().attr("arn")
    }

    #[test]
    fn test_s3_flow_log() {
        let fl = FlowLog::to_s3("vpc-1", arn("aws_s3_bucket", "bucket"))
            .with_log_format("${version} ${srcaddr}")
            .with_destination_options(DestinationOptions {
                file_format: FileFormat::PlainText,
                per_hour_partition: true,
            })
            .with_tag("Name", "all-events-to-s3");
        fl.validate().unwrap();

        let value = serde_json::to_value(&fl).unwrap();
        assert_eq!(value["log_destination_type"], json!("s3"));
        assert_eq!(value["traffic_type"], json!("ALL"));
        assert_eq!(value["log_format"], json!("$${version} $${srcaddr}"));
        assert_eq!(
            value["destination_options"],
            json!({"file_format": "plain-text", "per_hour_partition": true})
        );
        assert!(value.get("iam_role_arn").is_none());
        assert_eq!(fl.references().len(), 1);
    }

    #[test]
    fn test_log_group_flow_log_needs_role() {
        let mut fl = FlowLog::to_log_group(
            "vpc-1",
            arn("aws_cloudwatch_log_group", "lg"),
            arn("aws_iam_role", "role"),
        );
        fl.validate().unwrap();
        assert_eq!(fl.references().len(), 2);
        assert_eq!(fl.destination_type(), LogDestinationType::CloudWatchLogs);

        fl.iam_role_arn = None;
        assert!(fl.validate().is_err());
    }

    #[test]
    fn test_destination_options_only_for_s3() {
        let fl = FlowLog::to_log_group("vpc-1", "arn:lg", "arn:role").with_destination_options(
            DestinationOptions {
                file_format: FileFormat::Parquet,
                per_hour_partition: false,
            },
        );
        assert!(fl.validate().is_err());
    }

    #[test]
    fn test_traffic_type_override() {
        let fl = FlowLog::to_s3("vpc-1", "arn:aws:s3:::b").with_traffic_type(TrafficType::Reject);
        assert_eq!(serde_json::to_value(&fl).unwrap()["traffic_type"], json!("REJECT"));
    }

    #[test]
    fn test_empty_vpc_rejected() {
        assert!(FlowLog::to_s3("", "arn:aws:s3:::b").validate().is_err());
    }
}
